//! Структурное дерево документа и поиск по нему.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{OfxError, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub name: String,
    pub text: String,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Node {
            name: name.into(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Пошаговый спуск по именам дочерних узлов: "OFX/BANKMSGSRSV1/...".
    pub fn find(&self, path: &str) -> Option<&Node> {
        let mut cur = self;
        for step in path.split('/') {
            cur = cur.children.iter().find(|c| c.name == step)?;
        }
        Some(cur)
    }

    /// Первый потомок с данным именем, поиск в глубину.
    pub fn descendant(&self, name: &str) -> Option<&Node> {
        for c in &self.children {
            if c.name == name {
                return Some(c);
            }
            if let Some(n) = c.descendant(name) {
                return Some(n);
            }
        }
        None
    }

    /// Все потомки с данным именем в порядке документа.
    pub fn descendants(&self, name: &str) -> Vec<&Node> {
        let mut out = Vec::new();
        self.collect_descendants(name, &mut out);
        out
    }

    fn collect_descendants<'a>(&'a self, name: &str, out: &mut Vec<&'a Node>) {
        for c in &self.children {
            if c.name == name {
                out.push(c);
            }
            c.collect_descendants(name, out);
        }
    }

    /// Текст первого потомка с данным именем; отсутствие или пустой текст —
    /// это None, а не ошибка: решает вызывающая сторона.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.descendant(name)
            .map(|n| n.text.as_str())
            .filter(|s| !s.is_empty())
    }
}

/// Строит дерево из корректной разметки. Возвращает виртуальный корень
/// документа, чьим дочерним узлом является элемент OFX.
pub fn parse(xml: &str) -> Result<Node> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut doc = Node::new("");
    let mut stack: Vec<Node> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                stack.push(Node::new(
                    String::from_utf8_lossy(e.name().as_ref()).into_owned(),
                ));
            }
            Ok(Event::Empty(e)) => {
                let child = Node::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                match stack.last_mut() {
                    Some(parent) => parent.children.push(child),
                    None => doc.children.push(child),
                }
            }
            Ok(Event::Text(t)) => {
                let text = t.unescape().map_err(|e| OfxError::Markup {
                    detail: e.to_string(),
                    pos: reader.buffer_position(),
                })?;
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text);
                }
            }
            Ok(Event::End(e)) => {
                let done = stack.pop().ok_or_else(|| OfxError::Markup {
                    detail: format!(
                        "unmatched closing tag </{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    ),
                    pos: reader.buffer_position(),
                })?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(done),
                    None => doc.children.push(done),
                }
            }
            Ok(Event::Eof) => break,
            // декларации, комментарии и PI для нас не значимы
            Ok(_) => {}
            Err(e) => {
                return Err(OfxError::Markup {
                    detail: e.to_string(),
                    pos: reader.buffer_position(),
                })
            }
        }
    }

    if !stack.is_empty() {
        return Err(OfxError::Markup {
            detail: "unexpected end of input inside open element".to_string(),
            pos: reader.buffer_position(),
        });
    }
    Ok(doc)
}
