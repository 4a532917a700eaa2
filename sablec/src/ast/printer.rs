//!
//! Tree Outline Printer
//!
//! Renders an indented one-node-per-line outline, used by `sable parse`.
//!

use lasso::Rodeo;

use super::expressions::Value;
use super::visitor::NodeRef;

pub fn print_tree(root: NodeRef<'_>, interner: &Rodeo) -> String {
    let mut out = String::new();
    print_node(&mut out, root, interner, 0);
    out
}

fn print_node(out: &mut String, node: NodeRef<'_>, interner: &Rodeo, depth: usize) {
    out.push_str(&format!("{:indent$}{}", "", node.kind_name(), indent = depth * 2));
    match node {
        NodeRef::Class(n) => {
            out.push_str(&format!(" {}", interner.resolve(&n.name.symbol)));
        }
        NodeRef::Function(n) => {
            out.push_str(&format!(" {}", interner.resolve(&n.name.symbol)));
        }
        NodeRef::Parameter(n) => {
            out.push_str(&format!(" {}", interner.resolve(&n.name.symbol)));
        }
        NodeRef::Variable(n) => {
            out.push_str(&format!(" {}", interner.resolve(&n.name.symbol)));
        }
        NodeRef::Type(n) => {
            out.push_str(&format!(" {}{}", interner.resolve(&n.name.symbol), "*".repeat(n.pointer_depth)));
        }
        NodeRef::Label(n) => {
            out.push_str(&format!(" {}", interner.resolve(&n.name.symbol)));
        }
        NodeRef::Goto(n) => {
            out.push_str(&format!(" {}", interner.resolve(&n.label.symbol)));
        }
        NodeRef::Value(n) => {
            let text = match &n.value {
                Value::Integer(v) => v.to_string(),
                Value::Float(v) => v.to_string(),
                Value::Character(s) | Value::String(s) => interner.resolve(s).to_string(),
                Value::Boolean(v) => v.to_string(),
                Value::Null => "null".to_string(),
                Value::Identifier(ident) => interner.resolve(&ident.symbol).to_string(),
            };
            out.push(' ');
            out.push_str(&text);
        }
        NodeRef::Unary(n) => {
            out.push_str(&format!(" {}", n.op));
        }
        NodeRef::Binary(n) => {
            out.push_str(&format!(" {}", n.op));
        }
        NodeRef::MemberAccess(n) => {
            out.push_str(&format!(" {}{}", n.access, interner.resolve(&n.member.symbol)));
        }
        _ => {}
    }
    out.push('\n');
    for child in node.children() {
        print_node(out, child, interner, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::parse;

    #[test]
    fn test_print_outline() {
        let source = "var p : Integer* = a + 1;";
        let (tokens, interner) = tokenize(source);
        let block = parse(&tokens, source).unwrap();
        let text = print_tree(NodeRef::Block(&block), &interner);
        assert_eq!(
            text,
            "Block\n  Variable p\n    Type Integer*\n    BinaryOperator +\n      Value a\n      Value 1\n"
        );
    }
}
