//! Timed input scripts for the `simulate` command.
//!
//! One event per line: `<t_ms> turn <+N|-N>`, `<t_ms> press <button>` or
//! `<t_ms> release <button>`. Blank lines and `#` comments are skipped.

use eyre::{Result, eyre};
use speedctl_core::Button;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Detents; positive is clockwise
    Turn(i64),
    Press(Button),
    Release(Button),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptEvent {
    pub at_ms: u64,
    pub action: Action,
}

fn parse_button(s: &str) -> Option<Button> {
    match s.to_ascii_lowercase().as_str() {
        "encoder" | "knob" => Some(Button::Encoder),
        "back" => Some(Button::Back),
        "confirm" => Some(Button::Confirm),
        _ => None,
    }
}

fn parse_line(line: &str) -> std::result::Result<Option<ScriptEvent>, String> {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(None);
    }
    let mut parts = line.split_whitespace();
    let (Some(t), Some(verb), Some(arg), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err("expected `<t_ms> <turn|press|release> <arg>`".to_string());
    };
    let at_ms = t
        .parse::<u64>()
        .map_err(|_| format!("invalid time `{t}`"))?;
    let action = match verb {
        "turn" => {
            let n = arg
                .parse::<i64>()
                .map_err(|_| format!("invalid detent count `{arg}`"))?;
            if n == 0 {
                return Err("turn by 0 detents".to_string());
            }
            Action::Turn(n)
        }
        "press" | "release" => {
            let button = parse_button(arg).ok_or_else(|| format!("unknown button `{arg}`"))?;
            if verb == "press" {
                Action::Press(button)
            } else {
                Action::Release(button)
            }
        }
        other => return Err(format!("unknown action `{other}`")),
    };
    Ok(Some(ScriptEvent { at_ms, action }))
}

/// Parse a script; events come back ordered by time, ties in file order.
pub fn parse(text: &str) -> Result<Vec<ScriptEvent>> {
    let mut events = Vec::new();
    for (i, line) in text.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(ev)) => events.push(ev),
            Ok(None) => {}
            Err(msg) => return Err(eyre!("script line {}: {msg}", i + 1)),
        }
    }
    events.sort_by_key(|e| e.at_ms);
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_actions_and_comments() {
        let text = "\
# warm-up
0 turn +2
10 press confirm   # save
15 turn -1

20 release confirm
";
        let events = parse(text).unwrap();
        assert_eq!(
            events,
            vec![
                ScriptEvent { at_ms: 0, action: Action::Turn(2) },
                ScriptEvent { at_ms: 10, action: Action::Press(Button::Confirm) },
                ScriptEvent { at_ms: 15, action: Action::Turn(-1) },
                ScriptEvent { at_ms: 20, action: Action::Release(Button::Confirm) },
            ]
        );
    }

    #[test]
    fn out_of_order_lines_are_sorted_stably() {
        let events = parse("50 press back\n10 turn 1\n10 turn -1\n").unwrap();
        let times: Vec<_> = events.iter().map(|e| e.at_ms).collect();
        assert_eq!(times, vec![10, 10, 50]);
        assert_eq!(events[0].action, Action::Turn(1));
    }

    #[test]
    fn errors_name_the_line() {
        let err = parse("0 turn 1\n\n5 spin 3\n").unwrap_err();
        assert!(err.to_string().contains("script line 3"), "{err}");
        assert!(parse("x turn 1").is_err());
        assert!(parse("0 press elbow").is_err());
        assert!(parse("0 turn 0").is_err());
        assert!(parse("0 turn 1 2").is_err());
    }
}
