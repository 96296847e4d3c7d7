use super::TypedArena;

#[test]
fn alloc_keeps_references_stable() {
    let arena = TypedArena::default();

    let first = arena.alloc(1_u64);
    let refs: Vec<&u64> = (2..200_u64).map(|n| &*arena.alloc(n)).collect();

    assert_eq!(*first, 1);
    for (i, r) in refs.iter().enumerate() {
        assert_eq!(**r, i as u64 + 2);
    }
}

#[test]
fn alloc_iter_is_contiguous() {
    let arena = TypedArena::default();

    let slice = arena.alloc_iter(0..32_i32);
    assert_eq!(slice.len(), 32);
    assert_eq!(slice[0], 0);
    assert_eq!(slice[31], 31);

    let empty = arena.alloc_iter(core::iter::empty::<i32>());
    assert!(empty.is_empty());
}

#[test]
fn linked_nodes() {
    struct Node<'a> {
        next: Option<&'a Node<'a>>,
        val: u32,
    }

    let arena = TypedArena::default();
    let a = &*arena.alloc(Node { next: None, val: 1 });
    let b = &*arena.alloc(Node { next: Some(a), val: 2 });

    assert_eq!(b.next.unwrap().val, 1);
    assert_eq!(b.val, 2);
}
