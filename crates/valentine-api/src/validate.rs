//! Shape checks applied before anything reaches storage.

use valentine_db::{InsertConfession, InsertCreator, InsertMessage};
use valentine_types::api::{CreateConfessionRequest, CreateLinkRequest, SendMessageRequest};
use valentine_types::vocab::{self, MESSAGE_BOUQUET, MESSAGE_CONFESSION};

use crate::error::ApiError;

const MAX_NAME_LEN: usize = 50;
const MIN_CONFESSION_LEN: usize = 10;
const MAX_CONFESSION_LEN: usize = 1000;
const MIN_SLUG_LEN: usize = 3;
const MAX_SLUG_LEN: usize = 32;
const MIN_PASSCODE_LEN: usize = 4;
const MAX_PASSCODE_LEN: usize = 64;
const MAX_NOTE_LEN: usize = 500;
const MAX_META_LEN: usize = 200;

pub fn confession(req: CreateConfessionRequest) -> Result<InsertConfession, ApiError> {
    let sender_name = name("Sender name", &req.sender_name)?;

    if !vocab::is_intent_option(&req.intent_option) {
        return Err(bad("Pick one of the listed intentions"));
    }

    let len = req.message.trim().chars().count();
    if len < MIN_CONFESSION_LEN {
        return Err(bad("Message is too short"));
    }
    if req.message.chars().count() > MAX_CONFESSION_LEN {
        return Err(bad("Message is too long"));
    }

    Ok(InsertConfession {
        sender_name,
        intent_option: req.intent_option,
        message: req.message,
    })
}

pub fn response(value: &str) -> Result<(), ApiError> {
    if vocab::is_response(value) {
        Ok(())
    } else {
        Err(bad("Response must be one of yes, no or maybe"))
    }
}

pub fn creator(req: CreateLinkRequest) -> Result<InsertCreator, ApiError> {
    let display_name = name("Display name", &req.display_name)?;
    slug(&req.slug)?;

    let len = req.passcode.chars().count();
    if !(MIN_PASSCODE_LEN..=MAX_PASSCODE_LEN).contains(&len) {
        return Err(bad(format!(
            "Passcode must be {}-{} characters",
            MIN_PASSCODE_LEN, MAX_PASSCODE_LEN
        )));
    }

    Ok(InsertCreator {
        display_name,
        slug: req.slug,
        passcode: req.passcode,
    })
}

pub fn slug(value: &str) -> Result<(), ApiError> {
    let ok_len = (MIN_SLUG_LEN..=MAX_SLUG_LEN).contains(&value.len());
    let ok_chars = value
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');

    if ok_len && ok_chars && !value.starts_with('-') && !value.ends_with('-') {
        Ok(())
    } else {
        Err(bad(format!(
            "Link name must be {}-{} lowercase letters, digits or dashes",
            MIN_SLUG_LEN, MAX_SLUG_LEN
        )))
    }
}

pub fn message(req: SendMessageRequest) -> Result<InsertMessage, ApiError> {
    match req.kind.as_str() {
        MESSAGE_CONFESSION => {
            let content = req.content.as_deref().map(str::trim).unwrap_or_default();
            if content.is_empty() {
                return Err(bad("A confession needs some content"));
            }
            if content.chars().count() > MAX_CONFESSION_LEN {
                return Err(bad("Message is too long"));
            }
        }
        MESSAGE_BOUQUET => {
            if req.bouquet_id.as_deref().is_none_or(str::is_empty) {
                return Err(bad("Pick a bouquet"));
            }
        }
        _ => return Err(bad("Message type must be confession or bouquet")),
    }

    if req.note.as_deref().is_some_and(|n| n.chars().count() > MAX_NOTE_LEN) {
        return Err(bad("Note is too long"));
    }
    for meta in [&req.sender_device, &req.sender_location].into_iter().flatten() {
        if meta.chars().count() > MAX_META_LEN {
            return Err(bad("Sender details are too long"));
        }
    }

    Ok(InsertMessage {
        creator_id: req.creator_id,
        kind: req.kind,
        vibe: req.vibe,
        content: req.content,
        bouquet_id: req.bouquet_id,
        note: req.note,
        sender_device: req.sender_device,
        sender_location: req.sender_location,
    })
}

fn name(label: &str, value: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(bad(format!("{} is required", label)));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(bad(format!("{} is too long", label)));
    }
    Ok(trimmed.to_string())
}

fn bad(msg: impl Into<String>) -> ApiError {
    ApiError::BadRequest(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn confession_req(name: &str, intent: &str, message: &str) -> CreateConfessionRequest {
        CreateConfessionRequest {
            sender_name: name.into(),
            intent_option: intent.into(),
            message: message.into(),
        }
    }

    #[test]
    fn accepts_a_valid_confession_and_trims_the_name() {
        let input = confession(confession_req(
            "  Alex ",
            "A cup of coffee together",
            "I've liked you since chemistry class",
        ))
        .unwrap();
        assert_eq!(input.sender_name, "Alex");
        assert_eq!(input.message, "I've liked you since chemistry class");
    }

    #[test]
    fn rejects_bad_confessions() {
        let cases = [
            confession_req("", "A cup of coffee together", "long enough message"),
            confession_req(&"x".repeat(51), "A cup of coffee together", "long enough message"),
            confession_req("Alex", "Skydiving", "long enough message"),
            confession_req("Alex", "A cup of coffee together", "too short"),
            confession_req("Alex", "A cup of coffee together", &"a".repeat(1001)),
        ];
        for req in cases {
            assert!(matches!(confession(req), Err(ApiError::BadRequest(_))));
        }
    }

    #[test]
    fn only_three_responses_are_allowed() {
        for ok in ["yes", "no", "maybe"] {
            assert!(response(ok).is_ok());
        }
        for bad in ["YES", "", "sure"] {
            assert!(response(bad).is_err());
        }
    }

    #[test]
    fn slug_rules() {
        for ok in ["sarah", "to-sam-2026", "abc"] {
            assert!(slug(ok).is_ok(), "{ok}");
        }
        for bad in ["ab", "Sarah", "has space", "-lead", "trail-", "sl/ash", "a".repeat(33).as_str()] {
            assert!(slug(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn messages_need_type_specific_fields() {
        let confession_without_content = SendMessageRequest {
            creator_id: 1,
            kind: "confession".into(),
            content: Some("   ".into()),
            ..Default::default()
        };
        assert!(message(confession_without_content).is_err());

        let bouquet_without_id = SendMessageRequest {
            creator_id: 1,
            kind: "bouquet".into(),
            ..Default::default()
        };
        assert!(message(bouquet_without_id).is_err());

        let letter = SendMessageRequest {
            creator_id: 1,
            kind: "letter".into(),
            content: Some("hello".into()),
            ..Default::default()
        };
        assert!(message(letter).is_err());

        let bouquet = SendMessageRequest {
            creator_id: 1,
            kind: "bouquet".into(),
            bouquet_id: Some("bouquet-02".into()),
            note: Some("Happy Valentine's".into()),
            ..Default::default()
        };
        let input = message(bouquet).unwrap();
        assert_eq!(input.kind, "bouquet");
        assert_eq!(input.note.as_deref(), Some("Happy Valentine's"));
    }
}
