//! Нормализация терпимой SGML-разметки OFX в корректный однострочный XML.
//!
//! Legacy-формат опускает закрывающие теги у листовых полей; лист
//! завершается на следующем теге того же уровня или закрывающей границе.

use crate::error::{OfxError, Result};
use crate::tree::Node;

/// Агрегатные элементы OFX: содержат дочерние элементы и закрываются явно.
/// Любой тег вне этой таблицы — листовое поле.
const CONTAINERS: &[&str] = &[
    "OFX",
    "SIGNONMSGSRSV1",
    "SONRS",
    "STATUS",
    "FI",
    "BANKMSGSRSV1",
    "CREDITCARDMSGSRSV1",
    "STMTTRNRS",
    "CCSTMTTRNRS",
    "STMTRS",
    "CCSTMTRS",
    "BANKACCTFROM",
    "CCACCTFROM",
    "BANKACCTTO",
    "CCACCTTO",
    "BANKTRANLIST",
    "STMTTRN",
    "LEDGERBAL",
    "AVAILBAL",
];

fn is_container(name: &str) -> bool {
    CONTAINERS.contains(&name)
}

/// Усекает строку до `limit` байт по границе символа.
fn clip(src: &str, limit: usize) -> &str {
    match src.char_indices().find(|(i, _)| *i >= limit) {
        Some((i, _)) => &src[..i],
        None => src,
    }
}

#[derive(Debug)]
enum Token<'a> {
    Open(&'a str, usize),
    Close(&'a str, usize),
    Text(&'a str),
}

fn tokenize(src: &str) -> Result<Vec<Token<'_>>> {
    let mut out = Vec::new();
    let mut pos = 0;
    while pos < src.len() {
        match src[pos..].find('<') {
            Some(rel) => {
                if rel > 0 {
                    out.push(Token::Text(&src[pos..pos + rel]));
                }
                let start = pos + rel;
                let end = src[start..]
                    .find('>')
                    .map(|e| start + e)
                    .ok_or_else(|| OfxError::Markup {
                        detail: format!("unterminated tag {:?}", clip(&src[start..], 16)),
                        pos: start,
                    })?;
                let inner = src[start + 1..end].trim();
                match inner.strip_prefix('/') {
                    Some(name) => out.push(Token::Close(name.trim(), start)),
                    // комментарии и инструкции обработки пропускаем
                    None if inner.starts_with('!') || inner.starts_with('?') => {}
                    None => out.push(Token::Open(inner, start)),
                }
                pos = end + 1;
            }
            None => {
                out.push(Token::Text(&src[pos..]));
                break;
            }
        }
    }
    Ok(out)
}

/// Строит дерево из tag-soup и сериализует его обратно в одну строку XML.
pub fn normalize(src: &str) -> Result<String> {
    let mut stack: Vec<Node> = Vec::new();
    let mut roots: Vec<Node> = Vec::new();

    for token in tokenize(src)? {
        match token {
            Token::Text(t) => {
                // перенос строки внутри поля — не разрыв значения
                let joined: String = t.lines().map(str::trim).collect();
                if joined.is_empty() {
                    continue;
                }
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&decode_entities(&joined));
                }
            }
            Token::Open(name, _) => {
                while stack.last().is_some_and(|n| !is_container(&n.name)) {
                    close_top(&mut stack, &mut roots);
                }
                stack.push(Node::new(name));
            }
            Token::Close(name, pos) => {
                while stack
                    .last()
                    .is_some_and(|n| !is_container(&n.name) && n.name != name)
                {
                    close_top(&mut stack, &mut roots);
                }
                match stack.last() {
                    Some(top) if top.name == name => close_top(&mut stack, &mut roots),
                    _ => {
                        return Err(OfxError::Markup {
                            detail: format!("unmatched closing tag </{name}>"),
                            pos,
                        })
                    }
                }
            }
        }
    }
    // незакрытые на конце входа элементы закрываются автоматически
    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }

    let mut out = String::new();
    for root in &roots {
        write_xml(root, &mut out);
    }
    Ok(out)
}

fn close_top(stack: &mut Vec<Node>, roots: &mut Vec<Node>) {
    if let Some(done) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(done),
            None => roots.push(done),
        }
    }
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    // &amp; раскрывается последним, иначе &amp;lt; превратится в <
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn write_xml(node: &Node, out: &mut String) {
    out.push('<');
    out.push_str(&node.name);
    out.push('>');
    escape_into(&node.text, out);
    for child in &node.children {
        write_xml(child, out);
    }
    out.push_str("</");
    out.push_str(&node.name);
    out.push('>');
}

fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}
