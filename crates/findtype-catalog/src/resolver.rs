//! Type-expression resolver.
//!
//! Turns a spelling like `"struct task*"` or `"unsigned long [8]"` into
//! an abstract [`TypeHandle`]. Derived wrappers (pointer, reference,
//! array) are built fresh per call and never interned into the catalog,
//! so resolution takes `&TypeCatalog` and two resolutions of the same
//! spelling compare equal structurally.

use thiserror::Error;

use crate::catalog::TypeCatalog;
use crate::types::{TypeHandle, TypeKind};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("empty type expression")]
    Empty,

    #[error("no type named '{0}'")]
    UnknownType(String),

    #[error("'{name}' is not a {tag}")]
    TagMismatch { tag: String, name: String },

    #[error("syntax error at offset {pos}: {message}")]
    Syntax { pos: usize, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Star,
    Amp,
    OpenBracket,
    CloseBracket,
    Number(usize),
}

fn lex(expr: &str) -> Result<Vec<(usize, Token)>, ResolveError> {
    let mut tokens = Vec::new();
    let mut chars = expr.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '*' => {
                chars.next();
                tokens.push((pos, Token::Star));
            }
            '&' => {
                chars.next();
                tokens.push((pos, Token::Amp));
            }
            '[' => {
                chars.next();
                tokens.push((pos, Token::OpenBracket));
            }
            ']' => {
                chars.next();
                tokens.push((pos, Token::CloseBracket));
            }
            c if c.is_ascii_digit() => {
                let mut value: usize = 0;
                while let Some(&(_, d)) = chars.peek() {
                    if let Some(digit) = d.to_digit(10) {
                        value = value
                            .checked_mul(10)
                            .and_then(|v| v.checked_add(digit as usize))
                            .ok_or_else(|| ResolveError::Syntax {
                                pos,
                                message: "array length out of range".to_string(),
                            })?;
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((pos, Token::Number(value)));
            }
            c if c.is_alphanumeric() || c == '_' || c == ':' => {
                let mut word = String::new();
                while let Some(&(_, d)) = chars.peek() {
                    if d.is_alphanumeric() || d == '_' || d == ':' {
                        word.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push((pos, Token::Ident(word)));
            }
            _ => {
                return Err(ResolveError::Syntax {
                    pos,
                    message: format!("unexpected character '{}'", c),
                })
            }
        }
    }

    Ok(tokens)
}

/// Map multi-word builtin spellings onto the names the base catalog uses.
fn normalize_builtin(name: &str) -> &str {
    match name {
        "signed" | "signed int" => "int",
        "unsigned" => "unsigned int",
        "short int" | "signed short" | "signed short int" => "short",
        "unsigned short int" => "unsigned short",
        "long int" | "signed long" | "signed long int" => "long",
        "unsigned long int" => "unsigned long",
        "long long int" | "signed long long" | "signed long long int" => "long long",
        "unsigned long long int" => "unsigned long long",
        other => other,
    }
}

fn tag_matches(tag: &str, kind: &TypeKind) -> bool {
    match tag {
        "struct" => matches!(kind, TypeKind::Struct { .. }),
        "union" => matches!(kind, TypeKind::Union { .. }),
        "enum" => matches!(kind, TypeKind::Enum { .. }),
        _ => false,
    }
}

/// Resolve a type expression against the catalog.
///
/// Accepts an optional `struct`/`union`/`enum` tag, cv-qualifier words
/// (which are dropped), a base name, and trailing `*`, `&`, and `[n]`
/// suffixes applied left to right.
pub fn resolve(catalog: &TypeCatalog, expr: &str) -> Result<TypeHandle, ResolveError> {
    let tokens = lex(expr)?;
    let mut iter = tokens.into_iter().peekable();

    // Leading identifier words form the base name. cv-qualifiers are
    // dropped; a composite tag is remembered and checked against what
    // the name resolves to.
    let mut tag: Option<String> = None;
    let mut words: Vec<String> = Vec::new();
    while let Some((_, Token::Ident(word))) = iter.peek() {
        match word.as_str() {
            "const" | "volatile" => {}
            "struct" | "union" | "enum" if tag.is_none() && words.is_empty() => {
                tag = Some(word.clone());
            }
            _ => words.push(word.clone()),
        }
        iter.next();
    }

    if words.is_empty() {
        return Err(ResolveError::Empty);
    }

    let name = words.join(" ");
    let id = catalog
        .lookup(&name)
        .or_else(|| catalog.lookup(normalize_builtin(&name)))
        .ok_or_else(|| ResolveError::UnknownType(name.clone()))?;

    if let Some(tag) = tag {
        let canon = catalog.canonical(id);
        if !tag_matches(&tag, &catalog.get(canon).kind) {
            return Err(ResolveError::TagMismatch { tag, name });
        }
    }

    let mut handle = TypeHandle::Decl(id);
    while let Some((pos, token)) = iter.next() {
        match token {
            Token::Star => handle = TypeHandle::Pointer(Box::new(handle)),
            Token::Amp => handle = TypeHandle::Reference(Box::new(handle)),
            Token::OpenBracket => {
                let length = match iter.peek() {
                    Some((_, Token::Number(n))) => {
                        let n = *n;
                        iter.next();
                        Some(n)
                    }
                    _ => None,
                };
                match iter.next() {
                    Some((_, Token::CloseBracket)) => {}
                    _ => {
                        return Err(ResolveError::Syntax {
                            pos,
                            message: "unterminated array suffix".to_string(),
                        })
                    }
                }
                handle = TypeHandle::Array(Box::new(handle), length);
            }
            Token::Ident(word) => {
                return Err(ResolveError::Syntax {
                    pos,
                    message: format!("unexpected identifier '{}'", word),
                })
            }
            Token::Number(_) | Token::CloseBracket => {
                return Err(ResolveError::Syntax {
                    pos,
                    message: "unexpected token after type name".to_string(),
                })
            }
        }
    }

    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeId;

    fn catalog() -> TypeCatalog {
        TypeCatalog::with_base_types()
    }

    fn decl(id: TypeId) -> TypeHandle {
        TypeHandle::Decl(id)
    }

    #[test]
    fn plain_names() {
        let c = catalog();
        assert_eq!(resolve(&c, "int").unwrap(), decl(c.lookup("int").unwrap()));
        assert_eq!(
            resolve(&c, "unsigned long").unwrap(),
            decl(c.lookup("unsigned long").unwrap())
        );
        assert_eq!(
            resolve(&c, "double").unwrap(),
            decl(c.lookup("double").unwrap())
        );
    }

    #[test]
    fn builtin_spellings_normalize() {
        let c = catalog();
        let int = decl(c.lookup("int").unwrap());
        assert_eq!(resolve(&c, "signed").unwrap(), int);
        assert_eq!(resolve(&c, "signed int").unwrap(), int);
        assert_eq!(
            resolve(&c, "unsigned").unwrap(),
            decl(c.lookup("unsigned int").unwrap())
        );
        assert_eq!(
            resolve(&c, "long int").unwrap(),
            decl(c.lookup("long").unwrap())
        );
        assert_eq!(
            resolve(&c, "unsigned long long int").unwrap(),
            decl(c.lookup("unsigned long long").unwrap())
        );
    }

    #[test]
    fn qualifiers_are_dropped() {
        let c = catalog();
        let int = decl(c.lookup("int").unwrap());
        assert_eq!(resolve(&c, "const int").unwrap(), int);
        assert_eq!(resolve(&c, "volatile const int").unwrap(), int);
    }

    #[test]
    fn tagged_lookup() {
        let mut c = catalog();
        let int = c.lookup("int").unwrap();
        let foo = c.define_struct("Foo", &[("x", int)]);

        assert_eq!(resolve(&c, "struct Foo").unwrap(), decl(foo));
        assert_eq!(resolve(&c, "Foo").unwrap(), decl(foo));
        assert_eq!(
            resolve(&c, "union Foo"),
            Err(ResolveError::TagMismatch {
                tag: "union".to_string(),
                name: "Foo".to_string()
            })
        );
    }

    #[test]
    fn tag_checks_through_typedef() {
        let mut c = catalog();
        let int = c.lookup("int").unwrap();
        let foo = c.define_struct("Foo", &[("x", int)]);
        let td = c.typedef_of("FooT", foo);

        // The tag constrains what the name ultimately denotes.
        assert_eq!(resolve(&c, "struct FooT").unwrap(), decl(td));
    }

    #[test]
    fn suffixes() {
        let mut c = catalog();
        let int = c.lookup("int").unwrap();
        let foo = c.define_struct("Foo", &[("x", int)]);

        assert_eq!(
            resolve(&c, "struct Foo*").unwrap(),
            TypeHandle::Pointer(Box::new(decl(foo)))
        );
        assert_eq!(
            resolve(&c, "Foo **").unwrap(),
            TypeHandle::Pointer(Box::new(TypeHandle::Pointer(Box::new(decl(foo)))))
        );
        assert_eq!(
            resolve(&c, "Foo&").unwrap(),
            TypeHandle::Reference(Box::new(decl(foo)))
        );
        assert_eq!(
            resolve(&c, "int[4]").unwrap(),
            TypeHandle::Array(Box::new(decl(c.lookup("int").unwrap())), Some(4))
        );
        assert_eq!(
            resolve(&c, "int []").unwrap(),
            TypeHandle::Array(Box::new(decl(c.lookup("int").unwrap())), None)
        );
        assert_eq!(
            resolve(&c, "int*[8]").unwrap(),
            TypeHandle::Array(
                Box::new(TypeHandle::Pointer(Box::new(decl(
                    c.lookup("int").unwrap()
                )))),
                Some(8)
            )
        );
    }

    #[test]
    fn resolution_is_repeatable() {
        let mut c = catalog();
        let int = c.lookup("int").unwrap();
        c.define_struct("Foo", &[("x", int)]);

        let a = resolve(&c, "struct Foo*").unwrap();
        let b = resolve(&c, "struct Foo *").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn errors() {
        let c = catalog();
        assert_eq!(resolve(&c, ""), Err(ResolveError::Empty));
        assert_eq!(resolve(&c, "   "), Err(ResolveError::Empty));
        assert_eq!(resolve(&c, "const"), Err(ResolveError::Empty));
        assert_eq!(
            resolve(&c, "no_such_type"),
            Err(ResolveError::UnknownType("no_such_type".to_string()))
        );
        assert!(matches!(
            resolve(&c, "int @"),
            Err(ResolveError::Syntax { .. })
        ));
        assert!(matches!(
            resolve(&c, "int [4"),
            Err(ResolveError::Syntax { .. })
        ));
        assert!(matches!(
            resolve(&c, "int* junk"),
            Err(ResolveError::Syntax { .. })
        ));
        assert!(matches!(
            resolve(&c, "int 7"),
            Err(ResolveError::Syntax { .. })
        ));
    }

    #[test]
    fn scoped_names() {
        let mut c = catalog();
        let int = c.lookup("int").unwrap();
        let inner = c.define_struct("outer::Inner", &[("x", int)]);
        assert_eq!(resolve(&c, "struct outer::Inner").unwrap(), decl(inner));
    }
}
