use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::form::SectionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthTab {
    Login,
    Register,
}

/// One user interaction, as read from a JSON line: `{"type": "login", ...}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    SwitchTab {
        tab: AuthTab,
    },
    Register {
        email: String,
        password: String,
        confirm: String,
    },
    Login {
        email: String,
        password: String,
    },
    Logout,
    Input {
        field: String,
        value: String,
    },
    SelectPhoto {
        path: PathBuf,
    },
    AddSection {
        kind: SectionKind,
    },
    RemoveSection {
        kind: SectionKind,
        id: u32,
    },
    Export,
}

/// Reads one newline-terminated event line, trimmed.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected, so one
/// bad line is skipped by the JSON parser instead of ending the input stream.
/// Returns `None` at end of input.
pub async fn next_line_lossy<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    if reader.read_until(b'\n', buf).await? == 0 {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(buf).trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_lines() {
        let login: UiEvent =
            serde_json::from_str(r#"{"type":"login","email":"a@x.com","password":"p1"}"#).unwrap();
        assert_eq!(
            login,
            UiEvent::Login {
                email: "a@x.com".to_string(),
                password: "p1".to_string()
            }
        );

        let remove: UiEvent =
            serde_json::from_str(r#"{"type":"remove_section","kind":"work","id":3}"#).unwrap();
        assert_eq!(
            remove,
            UiEvent::RemoveSection {
                kind: SectionKind::Work,
                id: 3
            }
        );

        let export: UiEvent = serde_json::from_str(r#"{"type":"export"}"#).unwrap();
        assert_eq!(export, UiEvent::Export);
    }

    #[test]
    fn test_unknown_event_is_rejected() {
        assert!(serde_json::from_str::<UiEvent>(r#"{"type":"print"}"#).is_err());
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_does_not_end_input() {
        let mut input: &[u8] = b"\xff\xfe{\"type\":\"logout\"}\n{\"type\":\"export\"}\n";
        let mut buf = Vec::new();

        let first = next_line_lossy(&mut input, &mut buf).await.unwrap().unwrap();
        assert!(first.starts_with('\u{FFFD}'));
        assert!(serde_json::from_str::<UiEvent>(&first).is_err());

        let second = next_line_lossy(&mut input, &mut buf).await.unwrap().unwrap();
        assert_eq!(serde_json::from_str::<UiEvent>(&second).unwrap(), UiEvent::Export);

        assert_eq!(next_line_lossy(&mut input, &mut buf).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_last_line_without_newline_is_read() {
        let mut input: &[u8] = b"  {\"type\":\"logout\"}";
        let mut buf = Vec::new();
        let line = next_line_lossy(&mut input, &mut buf).await.unwrap().unwrap();
        assert_eq!(line, r#"{"type":"logout"}"#);
        assert_eq!(next_line_lossy(&mut input, &mut buf).await.unwrap(), None);
    }
}
