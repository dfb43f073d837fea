//! System tray icon with state-based updates.
//!
//! Manages a system tray icon with two states (Idle, Recording) and a context
//! menu to show the main window, open settings, or quit.

use crate::{AppError, AppResult, TrayIconState};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{info, instrument};
use tray_icon::menu::{Menu, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

/// Ids of the tray menu entries, shared with the async runtime.
#[derive(Debug, Clone)]
pub struct TrayMenuIds {
    /// "显示主界面"
    pub show: MenuId,
    /// "设置"
    pub settings: MenuId,
    /// "退出"
    pub quit: MenuId,
}

/// System tray icon manager.
pub struct TrayManager {
    tray_icon: TrayIcon,
    menu_ids: TrayMenuIds,
}

impl TrayManager {
    /// Create a new tray manager in the Idle state.
    #[track_caller]
    #[instrument]
    pub fn new() -> AppResult<Self> {
        let menu = Menu::new();

        let show_item = MenuItem::new("显示主界面", true, None);
        let settings_item = MenuItem::new("设置", true, None);
        let quit_item = MenuItem::new("退出", true, None);

        let menu_ids = TrayMenuIds {
            show: show_item.id().clone(),
            settings: settings_item.id().clone(),
            quit: quit_item.id().clone(),
        };

        menu.append_items(&[
            &show_item,
            &PredefinedMenuItem::separator(),
            &settings_item,
            &PredefinedMenuItem::separator(),
            &quit_item,
        ])
        .map_err(|e| AppError::TrayError {
            reason: format!("Failed to build tray menu: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let icon = Self::load_icon(TrayIconState::Idle)?;

        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(Self::tooltip(TrayIconState::Idle))
            .with_menu(Box::new(menu))
            .with_icon(icon)
            .build()
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!("System tray icon initialized");

        Ok(Self {
            tray_icon,
            menu_ids,
        })
    }

    /// Update the tray icon state with new icon and tooltip.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn update_state(&mut self, state: TrayIconState) -> AppResult<()> {
        let icon = Self::load_icon(state)?;

        self.tray_icon
            .set_icon(Some(icon))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.tray_icon
            .set_tooltip(Some(Self::tooltip(state)))
            .map_err(|e| AppError::TrayError {
                reason: format!("Failed to update tooltip: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        Ok(())
    }

    /// Ids of the menu entries.
    pub fn menu_ids(&self) -> &TrayMenuIds {
        &self.menu_ids
    }

    fn tooltip(state: TrayIconState) -> &'static str {
        match state {
            TrayIconState::Idle => "SpeechMate",
            TrayIconState::Recording => "SpeechMate - 录音中...",
        }
    }

    /// Load icon from compile-time embedded PNG bytes.
    #[track_caller]
    fn load_icon(state: TrayIconState) -> AppResult<Icon> {
        let png_bytes: &[u8] = match state {
            TrayIconState::Idle => include_bytes!("../resources/icons/idle.png"),
            TrayIconState::Recording => include_bytes!("../resources/icons/recording.png"),
        };

        let img = image::load_from_memory(png_bytes).map_err(|e| AppError::TrayError {
            reason: format!("Failed to decode embedded icon: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let rgba = img.into_rgba8();
        let (width, height) = (rgba.width(), rgba.height());

        Icon::from_rgba(rgba.into_raw(), width, height).map_err(|e| AppError::TrayError {
            reason: format!("Failed to create icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}
