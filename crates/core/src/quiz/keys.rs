use crate::quiz::controller::Intent;

/// Digit keys `1`..=`6` pick a choice; questions may have more choices, but
/// only the first six get a shortcut.
pub const MAX_CHOICE_SHORTCUTS: usize = 6;

/// Map a key pressed on the quiz screen to an intent.
///
/// `key` is the logical key value (`"1"`, `"n"`, `"Enter"`, ...).
/// `confirming` is true while the finish prompt is open; only `Enter` and
/// `Escape` mean something then.
#[must_use]
pub fn intent_for_key(key: &str, choice_count: usize, confirming: bool) -> Option<Intent> {
    if confirming {
        return match key {
            "Enter" => Some(Intent::ConfirmFinish),
            "Escape" => Some(Intent::CancelFinish),
            _ => None,
        };
    }

    match key {
        "n" | "N" => Some(Intent::Next),
        "p" | "P" => Some(Intent::Prev),
        digit if digit.len() == 1 => {
            let value = digit.chars().next()?.to_digit(10)?;
            let choice = usize::try_from(value).ok()?.checked_sub(1)?;
            (choice < MAX_CHOICE_SHORTCUTS && choice < choice_count).then_some(Intent::Answer(choice))
        }
        _ => None,
    }
}
