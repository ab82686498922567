//! Message text and Flickr short links.

use crate::constants::post::{BASE58_ALPHABET, SHORT_URL_PREFIX};
use crate::error::{Error, Result};

/// Build `"{title} by {author} {shortlink} {hashtag}"`.
///
/// When that exceeds `max_chars` characters the title alone is shortened
/// and ends in `…`; author, link and hashtag are kept whole.
pub fn compose_message(
    title: &str,
    author: &str,
    shortlink: &str,
    hashtag: &str,
    max_chars: usize,
) -> String {
    let tail = format!(" by {author} {shortlink} {hashtag}");
    let message = format!("{title}{tail}");
    if message.chars().count() <= max_chars {
        return message;
    }

    let room = max_chars.saturating_sub(tail.chars().count() + 1);
    let short: String = title.chars().take(room).collect();
    format!("{}…{tail}", short.trim_end())
}

/// Encode a number in Flickr's base58 alphabet.
#[allow(clippy::cast_possible_truncation)]
pub fn base58(mut n: u64) -> String {
    let base = BASE58_ALPHABET.len() as u64;
    let mut digits = Vec::new();
    while n >= base {
        digits.push(BASE58_ALPHABET[(n % base) as usize]);
        n /= base;
    }
    digits.push(BASE58_ALPHABET[n as usize]);
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}

/// `https://flic.kr/p/…` link for a numeric Flickr photo id.
pub fn short_url(photo_id: &str) -> Result<String> {
    let n: u64 = photo_id.parse().map_err(|_| Error::InvalidRecord {
        id: photo_id.to_string(),
        reason: "photo id is not numeric".to_string(),
    })?;
    Ok(format!("{SHORT_URL_PREFIX}{}", base58(n)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_message_format() {
        let msg = compose_message(
            "Snowy plover chick",
            "Jane Doe",
            "https://flic.kr/p/WZnmyV",
            "#birbybot",
            280,
        );
        assert_eq!(
            msg,
            "Snowy plover chick by Jane Doe https://flic.kr/p/WZnmyV #birbybot"
        );
    }

    #[test]
    fn test_compose_message_shortens_long_title() {
        let title = "a".repeat(300);
        let msg = compose_message(&title, "Jane", "https://flic.kr/p/2", "#birbybot", 280);
        assert_eq!(msg.chars().count(), 280);
        assert!(msg.ends_with("… by Jane https://flic.kr/p/2 #birbybot"));
    }

    #[test]
    fn test_compose_message_counts_characters_not_bytes() {
        let title = "ü".repeat(20);
        let msg = compose_message(&title, "J", "L", "#h", 25);
        assert_eq!(msg, format!("{}… by J L #h", "ü".repeat(14)));
        assert_eq!(msg.chars().count(), 25);
    }

    #[test]
    fn test_base58_known_values() {
        assert_eq!(base58(0), "1");
        assert_eq!(base58(57), "Z");
        assert_eq!(base58(58), "21");
        assert_eq!(base58(2_147_483_647), "4gLq58");
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            short_url("36092472285").unwrap(),
            "https://flic.kr/p/WZnmyV"
        );
        assert!(short_url("abc").is_err());
    }
}
