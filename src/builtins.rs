//! Manifest of the built-in functions reachable through the reserved
//! namespace (`ifj.write(...)`).
//!
//! The parser only checks that a dotted call names an entry of this table and
//! records the entry's arity on the callee. Argument checking belongs to the
//! semantic analyzer, which can read the same table.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::ast::types::{TypeBase, TypeRef};

/// Parameter kind of a built-in. `Any` is the `term` parameter of `write` and
/// `string`, which accept any value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuiltinParam {
    Any,
    Type { nullable: bool, base: TypeBase },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltinSignature {
    pub name: &'static str,
    pub params: Vec<BuiltinParam>,
    pub returns: TypeRef,
}

impl BuiltinSignature {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

#[derive(Debug, Clone)]
pub struct BuiltinTable {
    pub namespace: String,
    pub version: String,
    functions: HashMap<String, BuiltinSignature>,
}

lazy_static! {
    static ref IFJ24: BuiltinTable = {
        use BuiltinParam::Any;
        use TypeBase::{ByteSlice, Void, F64, I32};

        let p = |base| BuiltinParam::Type { nullable: false, base };
        let t = |base| TypeRef::new(false, base);
        let n = |base| TypeRef::new(true, base);

        let mut table = BuiltinTable::new("ifj", "ifj24");
        table.insert("readstr", vec![], n(ByteSlice));
        table.insert("readi32", vec![], n(I32));
        table.insert("readf64", vec![], n(F64));
        table.insert("write", vec![Any], t(Void));
        table.insert("i2f", vec![p(I32)], t(F64));
        table.insert("f2i", vec![p(F64)], t(I32));
        table.insert("string", vec![Any], t(ByteSlice));
        table.insert("length", vec![p(ByteSlice)], t(I32));
        table.insert("concat", vec![p(ByteSlice), p(ByteSlice)], t(ByteSlice));
        table.insert("substring", vec![p(ByteSlice), p(I32), p(I32)], n(ByteSlice));
        table.insert("strcmp", vec![p(ByteSlice), p(ByteSlice)], t(I32));
        table.insert("ord", vec![p(ByteSlice), p(I32)], t(I32));
        table.insert("chr", vec![p(I32)], t(ByteSlice));
        table
    };
}

impl BuiltinTable {
    pub fn new(namespace: &str, version: &str) -> Self {
        BuiltinTable {
            namespace: namespace.to_string(),
            version: version.to_string(),
            functions: HashMap::new(),
        }
    }

    /// The standard IFJ24 manifest under the `ifj` namespace.
    pub fn ifj24() -> Self {
        IFJ24.clone()
    }

    pub fn insert(&mut self, name: &'static str, params: Vec<BuiltinParam>, returns: TypeRef) {
        self.functions.insert(
            name.to_string(),
            BuiltinSignature {
                name,
                params,
                returns,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&BuiltinSignature> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn is_namespace(&self, name: &str) -> bool {
        self.namespace == name
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }

    /// Entry names in alphabetical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ifj24_manifest() {
        let table = BuiltinTable::ifj24();
        assert_eq!(table.namespace, "ifj");
        assert_eq!(table.version, "ifj24");
        assert_eq!(table.len(), 13);
        assert!(table.is_namespace("ifj"));
        assert!(!table.is_namespace("std"));
    }

    #[test]
    fn test_arity() {
        let table = BuiltinTable::ifj24();
        assert_eq!(table.get("readstr").map(|f| f.arity()), Some(0));
        assert_eq!(table.get("write").map(|f| f.arity()), Some(1));
        assert_eq!(table.get("concat").map(|f| f.arity()), Some(2));
        assert_eq!(table.get("substring").map(|f| f.arity()), Some(3));
        assert!(table.get("bogus").is_none());
    }

    #[test]
    fn test_return_types() {
        let table = BuiltinTable::ifj24();
        let readi32 = table.get("readi32").unwrap();
        assert!(readi32.returns.nullable);
        assert_eq!(readi32.returns.base, TypeBase::I32);

        let write = table.get("write").unwrap();
        assert_eq!(write.returns.base, TypeBase::Void);
        assert_eq!(write.params, vec![BuiltinParam::Any]);
    }

    #[test]
    fn test_custom_table() {
        let mut table = BuiltinTable::new("sys", "test");
        table.insert("exit", vec![BuiltinParam::Any], TypeRef::new(false, TypeBase::Void));
        assert!(table.contains("exit"));
        assert!(!table.contains("write"));
        assert_eq!(table.names(), vec!["exit"]);
    }
}
