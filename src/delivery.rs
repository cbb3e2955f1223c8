//! Turning a text into an ordered series of `sendMessage` calls.
//!
//! [`DeliveryPlan`] decides what each message will contain; [`deliver`]
//! sends the parts one after another and stops at the first failure.

use std::borrow::Cow;

use thiserror::Error;
use tracing::{error, info};

use crate::config::{SendOptions, TelegramConfig};
use crate::splitter::{Segments, TELEGRAM_MAX_LENGTH, split_message};
use crate::telegram::{BotClient, SendMessage, TelegramError};

/// Characters kept free in every part for the `📄 Part i/n` header.
pub const PART_HEADER_RESERVE: usize = 32;

/// A delivery that stopped before every part was sent.
#[derive(Debug, Error)]
#[error("Failed to send part {part}/{total}: {source}")]
pub struct DeliveryError {
    /// 1-based index of the part that failed.
    pub part: usize,
    /// Number of parts in the plan.
    pub total: usize,
    /// Parts sent successfully before the failure.
    pub delivered: usize,
    #[source]
    pub source: TelegramError,
}

/// Outcome of a completed delivery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Number of parts in the plan.
    pub total: usize,
    /// Message ids reported by Telegram, one entry per sent part.
    pub message_ids: Vec<Option<i64>>,
}

impl DeliveryReport {
    /// Returns the number of parts sent.
    #[must_use]
    pub fn sent(&self) -> usize {
        self.message_ids.len()
    }
}

/// One message of a plan, header included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part<'a> {
    /// 1-based position in the plan.
    pub index: usize,
    pub total: usize,
    pub body: Cow<'a, str>,
}

impl Part<'_> {
    /// Returns the character count of the message body.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.body.chars().count()
    }
}

/// The messages a text will be sent as.
#[derive(Debug, Clone)]
pub struct DeliveryPlan<'a> {
    segments: Segments<'a>,
    total: usize,
    numbered: bool,
}

impl<'a> DeliveryPlan<'a> {
    /// Plans delivery of `text` under the Telegram message limit.
    #[must_use]
    pub fn new(text: &'a str, options: &SendOptions) -> Self {
        let limit = if options.numbered_parts {
            TELEGRAM_MAX_LENGTH - PART_HEADER_RESERVE
        } else {
            TELEGRAM_MAX_LENGTH
        };
        Self::with_limit(text, limit, options.numbered_parts)
    }

    /// Plans delivery with an explicit segment limit.
    #[must_use]
    pub fn with_limit(text: &'a str, limit: usize, numbered: bool) -> Self {
        let segments = split_message(text, limit);
        let total = segments.clone().count();
        Self {
            segments,
            total,
            numbered,
        }
    }

    /// Returns the number of messages in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.total
    }

    /// Checks if there is nothing to send.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Iterates over the planned messages in send order.
    pub fn parts(&self) -> impl Iterator<Item = Part<'a>> + '_ {
        let total = self.total;
        let numbered = self.numbered && total > 1;
        self.segments
            .clone()
            .enumerate()
            .map(move |(i, segment)| {
                let index = i + 1;
                let body = if numbered {
                    Cow::Owned(format!("{}{}", part_header(index, total), segment.text))
                } else {
                    Cow::Borrowed(segment.text)
                };
                Part { index, total, body }
            })
    }
}

fn part_header(index: usize, total: usize) -> String {
    format!("📄 Part {index}/{total}\n\n")
}

/// Sends every part of `plan` to the configured chat, in order.
///
/// An empty plan succeeds without any request.
///
/// # Errors
///
/// Returns the first failure; later parts are not attempted.
pub async fn deliver(
    client: &BotClient,
    config: &TelegramConfig,
    plan: &DeliveryPlan<'_>,
    options: &SendOptions,
) -> Result<DeliveryReport, DeliveryError> {
    let mut report = DeliveryReport {
        total: plan.len(),
        message_ids: Vec::with_capacity(plan.len()),
    };

    if plan.is_empty() {
        info!("Nothing to send");
        return Ok(report);
    }

    for part in plan.parts() {
        info!(
            "Sending part {}/{} ({} chars)...",
            part.index,
            part.total,
            part.char_count()
        );

        let request = SendMessage {
            chat_id: &config.chat_id,
            text: &part.body,
            parse_mode: options.parse_mode.as_api_value(),
            disable_web_page_preview: options.disable_link_preview,
            disable_notification: options.disable_notification,
        };

        match client.send_message(&request).await {
            Ok(sent) => report.message_ids.push(sent.message_id),
            Err(source) => {
                error!(
                    "Stopping delivery: part {}/{} failed ({} sent)",
                    part.index,
                    part.total,
                    report.sent()
                );
                return Err(DeliveryError {
                    part: part.index,
                    total: part.total,
                    delivered: report.sent(),
                    source,
                });
            }
        }
    }

    info!("Delivered {}/{} part(s)", report.sent(), report.total);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_plan() {
        let plan = DeliveryPlan::new("", &SendOptions::default());
        assert!(plan.is_empty());
        assert_eq!(plan.parts().count(), 0);
    }

    #[test]
    fn test_single_part_borrows_text() {
        let plan = DeliveryPlan::new("hello", &SendOptions::default());
        let parts: Vec<_> = plan.parts().collect();
        assert_eq!(parts.len(), 1);
        assert!(matches!(parts[0].body, Cow::Borrowed("hello")));
        assert_eq!((parts[0].index, parts[0].total), (1, 1));
    }

    #[test]
    fn test_leading_blank_lines_never_form_a_part() {
        let text = format!("{}report", "\n".repeat(TELEGRAM_MAX_LENGTH + 10));
        let plan = DeliveryPlan::new(&text, &SendOptions::default());
        let bodies: Vec<_> = plan.parts().map(|p| p.body).collect();
        assert_eq!(bodies, vec!["report"]);
    }

    #[test]
    fn test_numbered_single_part_has_no_header() {
        let options = SendOptions {
            numbered_parts: true,
            ..SendOptions::default()
        };
        let plan = DeliveryPlan::new("hello", &options);
        let parts: Vec<_> = plan.parts().collect();
        assert_eq!(parts[0].body, "hello");
    }

    #[test]
    fn test_numbered_parts_get_headers() {
        let plan = DeliveryPlan::with_limit("aaa\nbbb", 3, true);
        let bodies: Vec<String> = plan.parts().map(|p| p.body.into_owned()).collect();
        assert_eq!(
            bodies,
            vec!["📄 Part 1/2\n\naaa".to_owned(), "📄 Part 2/2\n\nbbb".to_owned()]
        );
    }

    #[test]
    fn test_numbered_parts_fit_telegram_limit() {
        let text = "y".repeat(TELEGRAM_MAX_LENGTH * 3);
        let options = SendOptions {
            numbered_parts: true,
            ..SendOptions::default()
        };
        let plan = DeliveryPlan::new(&text, &options);
        assert_eq!(plan.len(), 4);
        assert!(plan.parts().all(|p| p.char_count() <= TELEGRAM_MAX_LENGTH));
    }

    #[test]
    fn test_header_fits_reserve() {
        assert!(part_header(9999, 9999).chars().count() <= PART_HEADER_RESERVE);
    }

    #[test]
    fn test_parts_can_be_walked_twice() {
        let text = "z".repeat(9000);
        let plan = DeliveryPlan::new(&text, &SendOptions::default());
        let first: Vec<usize> = plan.parts().map(|p| p.char_count()).collect();
        let second: Vec<usize> = plan.parts().map(|p| p.char_count()).collect();
        assert_eq!(first, vec![4096, 4096, 808]);
        assert_eq!(first, second);
    }
}
