use super::*;

#[test]
fn intern_deduplicates() {
    let mut interner = Interner::new();

    let a = interner.intern("DEFAULT");
    let b = interner.intern("IN_COMMENT");
    let c = interner.intern("DEFAULT");

    assert_eq!(a, c);
    assert_ne!(a, b);
    assert_eq!(interner.len(), 2);
}

#[test]
fn resolve_and_lookup() {
    let mut interner = Interner::new();
    let sym = interner.intern("Expression");

    assert_eq!(interner.resolve(sym), "Expression");
    assert_eq!(interner.get("Expression"), Some(sym));
    assert_eq!(interner.get("Statement"), None);
    assert_eq!(interner.try_resolve(Symbol::from_raw(7)), None);
}

#[test]
fn symbols_follow_insertion_order() {
    let mut interner = Interner::new();
    let z = interner.intern("zeta");
    let a = interner.intern("alpha");

    assert!(z < a);
    let names: Vec<_> = interner.iter().map(|(_, s)| s).collect();
    assert_eq!(names, ["zeta", "alpha"]);
}
