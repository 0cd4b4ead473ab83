//! Global hotkeys for one-shot layouts
//!
//! Each binding maps a key chord to one named rectangle of a layout scheme.
//! Registration happens on the calling thread with no window, so `WM_HOTKEY`
//! lands in that thread's queue and is drained by [`LayoutHotkeys::poll`]
//! from the main loop.

use crate::domain::grid::{LayoutScheme, LayoutSlot};

/// Modifier keys for hotkey combinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeyModifier {
    Alt = 1,
    Control = 2,
    Shift = 4,
    Windows = 8,
}

/// Virtual key codes used by the layout bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VirtualKey {
    Left = 0x25,
    Right = 0x27,
    D = 0x44,
    F = 0x46,
    G = 0x47,
    I = 0x49,
    J = 0x4A,
    K = 0x4B,
    U = 0x55,
}

/// Hotkey registration errors
#[derive(Debug, thiserror::Error)]
pub enum HotkeyError {
    #[error("Failed to register hotkey {key:?} with modifiers {modifiers:?}")]
    RegistrationFailed {
        key: VirtualKey,
        modifiers: &'static [HotkeyModifier],
    },
}

/// One chord bound to one layout rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutBinding {
    pub modifiers: &'static [HotkeyModifier],
    pub key: VirtualKey,
    pub scheme: LayoutScheme,
    pub slot: LayoutSlot,
}

impl LayoutBinding {
    /// `MOD_*` bit mask for `RegisterHotKey`
    pub fn modifier_mask(&self) -> u32 {
        self.modifiers.iter().fold(0u32, |acc, &modifier| acc | modifier as u32)
    }
}

const CTRL_ALT: &[HotkeyModifier] = &[HotkeyModifier::Control, HotkeyModifier::Alt];

/// Ctrl+Alt chords: arrows for halves, D/F/G for thirds, U/I/J/K for quarters
pub fn default_bindings() -> Vec<LayoutBinding> {
    let bind = |key, scheme, slot| LayoutBinding {
        modifiers: CTRL_ALT,
        key,
        scheme,
        slot,
    };
    vec![
        bind(VirtualKey::Left, LayoutScheme::Halves, LayoutSlot::Left),
        bind(VirtualKey::Right, LayoutScheme::Halves, LayoutSlot::Right),
        bind(VirtualKey::D, LayoutScheme::Thirds, LayoutSlot::LeftThird),
        bind(VirtualKey::F, LayoutScheme::Thirds, LayoutSlot::CenterThird),
        bind(VirtualKey::G, LayoutScheme::Thirds, LayoutSlot::RightThird),
        bind(VirtualKey::U, LayoutScheme::Quarters, LayoutSlot::TopLeft),
        bind(VirtualKey::I, LayoutScheme::Quarters, LayoutSlot::TopRight),
        bind(VirtualKey::J, LayoutScheme::Quarters, LayoutSlot::BottomLeft),
        bind(VirtualKey::K, LayoutScheme::Quarters, LayoutSlot::BottomRight),
    ]
}

#[cfg(windows)]
pub use registration::LayoutHotkeys;

#[cfg(windows)]
mod registration {
    use tracing::{debug, warn};
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        RegisterHotKey, UnregisterHotKey, HOT_KEY_MODIFIERS, MOD_NOREPEAT,
    };
    use windows::Win32::UI::WindowsAndMessaging::{PeekMessageW, MSG, PM_REMOVE, WM_HOTKEY};

    use super::{HotkeyError, LayoutBinding};

    /// RAII registration of a binding table
    ///
    /// Hotkeys belong to the thread that registered them, so the guard must
    /// be created, polled and dropped on the same thread.
    pub struct LayoutHotkeys {
        bindings: Vec<LayoutBinding>,
        /// Ids registered so far; id `n` is `bindings[n - 1]`
        registered: Vec<i32>,
    }

    impl LayoutHotkeys {
        /// Registers every binding; a chord taken by another program is
        /// skipped with a warning rather than failing the whole table
        pub fn register(bindings: Vec<LayoutBinding>) -> Result<Self, HotkeyError> {
            let mut hotkeys = Self {
                bindings,
                registered: Vec::new(),
            };
            for (index, binding) in hotkeys.bindings.iter().enumerate() {
                let id = index as i32 + 1;
                let modifiers = HOT_KEY_MODIFIERS(binding.modifier_mask()) | MOD_NOREPEAT;
                match unsafe { RegisterHotKey(HWND(0), id, modifiers, binding.key as u32) } {
                    Ok(()) => {
                        debug!(key = ?binding.key, slot = %binding.slot, "registered layout hotkey");
                        hotkeys.registered.push(id);
                    }
                    Err(err) => warn!(key = ?binding.key, %err, "layout hotkey unavailable"),
                }
            }
            if hotkeys.registered.is_empty() && !hotkeys.bindings.is_empty() {
                let first = hotkeys.bindings[0];
                return Err(HotkeyError::RegistrationFailed {
                    key: first.key,
                    modifiers: first.modifiers,
                });
            }
            Ok(hotkeys)
        }

        /// Drains pending hotkey presses without blocking
        pub fn poll(&self) -> Vec<LayoutBinding> {
            let mut pressed = Vec::new();
            let mut msg = MSG::default();
            while unsafe { PeekMessageW(&mut msg, HWND(0), WM_HOTKEY, WM_HOTKEY, PM_REMOVE) }.as_bool() {
                let index = (msg.wParam.0 as usize).wrapping_sub(1);
                if let Some(binding) = self.bindings.get(index) {
                    pressed.push(*binding);
                }
            }
            pressed
        }
    }

    impl Drop for LayoutHotkeys {
        fn drop(&mut self) {
            for id in self.registered.drain(..) {
                unsafe {
                    UnregisterHotKey(HWND(0), id).ok();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ctrl_alt_mask() {
        let binding = default_bindings()[0];
        assert_eq!(binding.modifier_mask(), 0x0003);
    }

    #[test]
    fn default_chords_are_unique() {
        let bindings = default_bindings();
        let chords: HashSet<(u32, VirtualKey)> = bindings
            .iter()
            .map(|binding| (binding.modifier_mask(), binding.key))
            .collect();
        assert_eq!(chords.len(), bindings.len());
    }

    #[test]
    fn every_binding_names_a_slot_of_its_scheme() {
        for binding in default_bindings() {
            assert!(
                binding.scheme.slots().contains(&binding.slot),
                "{:?} is not part of {:?}",
                binding.slot,
                binding.scheme
            );
        }
    }
}
