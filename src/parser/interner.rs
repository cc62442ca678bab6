use std::{collections::HashSet, sync::Arc};

use crate::ast::ast::Ident;

/// Hands out one shared allocation per distinct identifier text.
#[derive(Debug, Default)]
pub struct Interner {
    names: HashSet<Arc<str>>,
}

impl Interner {
    pub fn new() -> Self {
        Interner {
            names: HashSet::with_capacity(64),
        }
    }

    pub fn intern(&mut self, name: &str) -> Ident {
        if let Some(existing) = self.names.get(name) {
            return Arc::clone(existing);
        }

        let ident: Ident = Arc::from(name);
        self.names.insert(Arc::clone(&ident));
        ident
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern() {
        let mut interner = Interner::new();
        let foo = interner.intern("foo");
        assert_eq!(&*foo, "foo");
        assert_eq!(interner.len(), 1);

        let again = interner.intern("foo");
        assert!(Arc::ptr_eq(&foo, &again));
        assert_eq!(interner.len(), 1);

        let bar = interner.intern("bar");
        assert!(!Arc::ptr_eq(&foo, &bar));
        assert_eq!(interner.len(), 2);

        interner.intern("foot");
        assert_eq!(interner.len(), 3);
    }
}
