//! Chat command adapter
//!
//! Translates the `close <start> <end>` chat command into an engine call and
//! renders the outcome as a short human-readable message. The outbound
//! messenger is an opaque gateway; engine failures become a failure notice
//! in the chat, never a raw error dump.

use crate::{
    config::Config,
    engine::SettlementEngine,
    period::{self, DateRange},
    types::{CloseOutcome, SettlementResult},
    Error, Result,
};
use async_trait::async_trait;
use expense_ledger::CoupleId;

/// Outbound text-message gateway (WhatsApp or any other transport)
#[async_trait]
pub trait MessageGateway: Send + Sync {
    /// Deliver a text message to a chat thread
    async fn send_text(&self, chat_id: &str, body: &str) -> Result<()>;
}

/// Parse a close command of the form `close 01/08/2026 31/08/2026`.
///
/// The keyword comes from configuration; dates accept `DD/MM/YYYY` or ISO
/// `YYYY-MM-DD` and must be in order.
pub fn parse_close_command(text: &str, config: &Config) -> Result<DateRange> {
    let mut parts = text.split_whitespace();

    let keyword = parts
        .next()
        .ok_or_else(|| Error::InvalidCommand("empty command".to_string()))?;
    if !keyword.eq_ignore_ascii_case(&config.close_keyword) {
        return Err(Error::InvalidCommand(format!(
            "expected '{}' command, got '{}'",
            config.close_keyword, keyword
        )));
    }

    let start = parts
        .next()
        .ok_or_else(|| Error::InvalidCommand("missing start date".to_string()))?;
    let end = parts
        .next()
        .ok_or_else(|| Error::InvalidCommand("missing end date".to_string()))?;
    if parts.next().is_some() {
        return Err(Error::InvalidCommand(
            "too many arguments; expected two dates".to_string(),
        ));
    }

    DateRange::new(period::parse_date(start)?, period::parse_date(end)?)
}

/// Render a closed period as a chat summary
pub fn format_summary(result: &SettlementResult, config: &Config) -> String {
    let mut lines = vec![
        format!("Period closed: {}", result.period_reference),
        format!(
            "Total spent: {} {:.2}",
            config.currency_symbol, result.total_general
        ),
        format!(
            "{}: {} {:.2}",
            result.partner_1_name, config.currency_symbol, result.total_partner_1
        ),
        format!(
            "{}: {} {:.2}",
            result.partner_2_name, config.currency_symbol, result.total_partner_2
        ),
        format!("Split: {}", result.split_type),
    ];

    match (&result.payer_name, &result.receiver_name) {
        (Some(payer), Some(receiver)) => lines.push(format!(
            "{} pays {} {} {:.2}",
            payer, receiver, config.currency_symbol, result.transfer_amount
        )),
        _ => lines.push("All balanced, no transfer needed.".to_string()),
    }

    lines.join("\n")
}

/// Handle a close command end to end.
///
/// Parses the command, runs the close and sends the summary to the chat.
/// Engine failures are reported to the chat as a short notice and returned;
/// gateway failures propagate as-is.
pub async fn handle_close_command(
    engine: &SettlementEngine,
    gateway: &dyn MessageGateway,
    chat_id: &str,
    couple_id: CoupleId,
    text: &str,
    config: &Config,
) -> Result<()> {
    let range = match parse_close_command(text, config) {
        Ok(range) => range,
        Err(e) => {
            gateway
                .send_text(
                    chat_id,
                    &format!(
                        "Could not read that command. Use: {} DD/MM/YYYY DD/MM/YYYY",
                        config.close_keyword
                    ),
                )
                .await?;
            return Err(e);
        }
    };

    match engine.close_period(couple_id, range).await {
        Ok(CloseOutcome::Closed(result)) => {
            gateway
                .send_text(chat_id, &format_summary(&result, config))
                .await
        }
        Ok(CloseOutcome::NothingToClose) => {
            gateway
                .send_text(chat_id, "No unsettled expenses in this period.")
                .await
        }
        Err(e) => {
            tracing::error!(couple_id = %couple_id, error = %e, "Close command failed");
            gateway
                .send_text(chat_id, "Could not close the period. Try again later.")
                .await?;
            Err(e)
        }
    }
}
