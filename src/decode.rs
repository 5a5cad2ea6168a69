//! Декодеры полей: инвариантный числовой формат и токены дат OFX.
//!
//! Оба декодера не зависят от локали хоста: десятичный разделитель —
//! всегда точка, даты — всегда YYYYMMDD[HHMMSS].

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;

use crate::error::{OfxError, Result};

/// Сигнальное значение для отсутствующих необязательных дат.
pub fn epoch() -> NaiveDateTime {
    DateTime::<Utc>::UNIX_EPOCH.naive_utc()
}

/// Сумма: знак, цифры и одна точка. Запятая в любой роли не принимается.
pub fn amount(raw: &str) -> Result<Decimal> {
    let invariant = !raw.is_empty()
        && raw
            .bytes()
            .all(|b| b.is_ascii_digit() || b == b'.' || b == b'-' || b == b'+');
    if !invariant {
        return Err(OfxError::Amount {
            raw: raw.to_string(),
        });
    }
    raw.parse::<Decimal>().map_err(|_| OfxError::Amount {
        raw: raw.to_string(),
    })
}

/// Токен даты: обязательный префикс YYYYMMDD, затем необязательный HHMMSS;
/// дробные секунды и суффикс таймзоны в квадратных скобках отбрасываются.
pub fn datetime(raw: &str) -> Result<NaiveDateTime> {
    let err = || OfxError::Date {
        raw: raw.to_string(),
    };

    let head = raw.split('[').next().unwrap_or(raw);
    let head = head.split('.').next().unwrap_or(head).trim();

    if head.len() < 8 || !head.bytes().take(8).all(|b| b.is_ascii_digit()) {
        return Err(err());
    }
    let date = NaiveDate::parse_from_str(&head[..8], "%Y%m%d").map_err(|_| err())?;

    let time = if head.len() >= 14 {
        if !head.bytes().skip(8).take(6).all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        NaiveTime::parse_from_str(&head[8..14], "%H%M%S").map_err(|_| err())?
    } else if head.len() == 8 {
        NaiveTime::MIN
    } else {
        // усечённое время вида YYYYMMDDHH считаем испорченным токеном
        return Err(err());
    };

    Ok(NaiveDateTime::new(date, time))
}
