//! Проверка и срез фиксированного заголовка legacy-формата.

use crate::error::{OfxError, Result};

/// Маркер legacy-формата; если его нет, вход уже структурирован
/// и заголовочный шаг пропускается целиком. Версия после двоеточия
/// проверяется уже самой валидацией заголовка.
pub const SGML_MARKER: &str = "OFXHEADER:";

/// Восемь обязательных строк заголовка, в фиксированном порядке.
const EXPECTED: [(&str, &str); 8] = [
    ("OFXHEADER", "OFXHEADER:100"),
    ("DATA", "DATA:OFXSGML"),
    ("VERSION", "VERSION:102"),
    ("SECURITY", "SECURITY:NONE"),
    ("ENCODING", "ENCODING:USASCII"),
    ("CHARSET", "CHARSET:1252"),
    ("COMPRESSION", "COMPRESSION:NONE"),
    ("OLDFILEUID", "OLDFILEUID:NONE"),
];

/// Заголовок, склеенный производителем в одну строку без разделителей.
const UNDELIMITED: &str = "OFXHEADER:100DATA:OFXSGMLVERSION:102SECURITY:NONEENCODING:USASCIICHARSET:1252COMPRESSION:NONEOLDFILEUID:NONENEWFILEUID:NONE";

pub fn is_sgml(text: &str) -> bool {
    text.contains(SGML_MARKER)
}

/// Проверяет заголовок и возвращает остаток документа без него.
/// Заголовок — текст до первого '<'; строки сравниваются с ожидаемыми
/// литералами побайтово.
pub fn strip(text: &str) -> Result<&str> {
    let body_start = text
        .find('<')
        .ok_or_else(|| OfxError::MissingSection("OFX".to_string()))?;

    let lines: Vec<&str> = text[..body_start]
        .split(|c| c == '\n' || c == '\r')
        .filter(|l| !l.is_empty())
        .collect();

    if lines.first().copied() != Some(UNDELIMITED) {
        for (i, (field, expected)) in EXPECTED.iter().enumerate() {
            let actual = lines.get(i).copied().unwrap_or("");
            if actual != *expected {
                return Err(OfxError::Header {
                    field,
                    expected,
                    actual: actual.to_string(),
                });
            }
        }
    }

    Ok(text[body_start..].trim())
}
