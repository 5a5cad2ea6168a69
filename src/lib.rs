//! ofxlib — чтение банковских и карточных выписок в формате OFX
//! (legacy SGML с фиксированным заголовком и уже структурированная разметка).

pub mod decode;
pub mod error;
pub mod header;
pub mod model;
pub mod paths;
pub mod parser;
pub mod sgml;
pub mod tree;

pub use error::{OfxError, Result};
pub use model::OfxDocument;
pub use parser::OfxParser;

/// Удобная точка входа: разбор уже декодированного текста.
pub fn parse(ofx: &str) -> Result<OfxDocument> {
    OfxParser::parse_str(ofx)
}
