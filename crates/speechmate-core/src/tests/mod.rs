mod bridge;
mod support;
