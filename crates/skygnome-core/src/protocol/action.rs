use once_cell::sync::Lazy;
use regex::Regex;
use time::{Duration, OffsetDateTime, Time};

use crate::DecodedEvent;

use super::reader::parse_int_prefix;

/// Programme start such as `9.23pm` or `10.02AM`.
static START_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)\.([0-9]+)([ap]m)").expect("start time regex"));

/// Semantic meaning of one block, keyed by its four-character code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// `SSCN`, or `CE00` while a channel number is being typed.
    ChannelNumber,
    /// `SSCA`
    ChannelName,
    /// `SSDT`: the box clock; carried but not used.
    ClockTime,
    /// `SST0`
    StartTime,
    /// `SSN0`
    Title,
    /// `SSE0`
    Synopsis,
    /// `SSEI`
    Trickplay,
    /// `CEER` invalid channel, `SYFS` audio unavailable, `SYD1` other
    /// system messages, `PUSP` signal problems, `PUCP` conditional access.
    Message,
    /// `SYIC`
    PinRequired,
    /// `SYST`
    Power,
    /// `SYIA`
    Interactive,
    Unknown,
}

impl Action {
    pub fn from_code(code: &str) -> Self {
        match code {
            "SSCN" | "CE00" => Action::ChannelNumber,
            "SSCA" => Action::ChannelName,
            "SSDT" => Action::ClockTime,
            "SST0" => Action::StartTime,
            "SSN0" => Action::Title,
            "SSE0" => Action::Synopsis,
            "SSEI" => Action::Trickplay,
            "CEER" | "SYFS" | "SYD1" | "PUSP" | "PUCP" => Action::Message,
            "SYIC" => Action::PinRequired,
            "SYST" => Action::Power,
            "SYIA" => Action::Interactive,
            _ => Action::Unknown,
        }
    }

    /// Apply the block's effect to the record. Never fails; payloads that do
    /// not parse leave the corresponding field null.
    pub fn apply(self, code: &str, payload: &str, event: &mut DecodedEvent, now: OffsetDateTime) {
        match self {
            Action::ChannelNumber => {
                event.channel.number =
                    parse_int_prefix(payload.as_bytes()).and_then(|n| i32::try_from(n).ok());
                event.epg.channel = Some(payload.to_string());
            }
            Action::ChannelName => {
                event.channel.name = Some(payload.to_string());
            }
            Action::ClockTime => {}
            Action::StartTime => {
                event.showing.started = parse_start_time(payload, now);
                event.epg.started = Some(payload.to_string());
            }
            Action::Title => {
                event.program.title = Some(payload.to_string());
                event.epg.title = Some(payload.to_string());
            }
            Action::Synopsis => {
                event.program.synopsis = Some(payload.to_string());
                event.epg.description = Some(payload.to_string());
            }
            Action::Trickplay => {
                event.system.trickplay = Some(payload.to_lowercase());
            }
            Action::Message => {
                // single characters such as '0' are line noise
                if payload.chars().count() > 1 {
                    event.system.message = Some(payload.to_string());
                }
            }
            Action::PinRequired => {
                event.system.pin = Some(payload == "8080");
            }
            Action::Power => {
                event.system.power = Some(payload == "0");
            }
            Action::Interactive => {
                event.system.interactive = Some(payload == "1");
            }
            Action::Unknown => {
                if !payload.is_empty() {
                    event.system.other.push(format!("{code}:{payload}"));
                }
            }
        }
    }
}

/// Resolve a 12-hour `H.MMam`/`H.MMpm` start against `now`.
///
/// The guide only carries a time of day. A start later than `now` must have
/// been before midnight, so it is moved back one day.
pub fn parse_start_time(payload: &str, now: OffsetDateTime) -> Option<OffsetDateTime> {
    let lowered = payload.to_lowercase();
    let caps = START_TIME.captures(&lowered)?;
    let hour = i64::from(caps[1].parse::<u32>().ok()?);
    let minute = i64::from(caps[2].parse::<u32>().ok()?);
    let hour = if &caps[3] == "pm" { hour + 12 } else { hour };

    let midnight = now.replace_time(Time::MIDNIGHT);
    let start = midnight
        .checked_add(Duration::hours(hour))?
        .checked_add(Duration::minutes(minute))?;
    if start > now {
        start.checked_sub(Duration::days(1))
    } else {
        Some(start)
    }
}
