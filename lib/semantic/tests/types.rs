use semantic::{Field, Ty, TypeCtx};

#[test]
fn construction_is_idempotent() {
    let tcx = TypeCtx::default();

    let a = tcx.signed(32);
    let b = tcx.signed(32);
    assert!(Ty::equals(a, b));
    assert_eq!(a.id, b.id);

    let f1 = tcx.function(tcx.void(), [tcx.signed(32), tcx.unsigned(8)], false);
    let f2 = tcx.function(tcx.void(), [tcx.signed(32), tcx.unsigned(8)], false);
    assert!(Ty::equals(f1, f2));

    let p1 = tcx.pointer(tcx.pointer(tcx.bool()));
    let p2 = tcx.pointer(tcx.pointer(tcx.bool()));
    assert!(Ty::equals(p1, p2));

    assert!(!Ty::equals(tcx.signed(32), tcx.unsigned(32)));
    assert!(!Ty::equals(tcx.signed(32), tcx.signed(16)));
}

#[test]
fn const_is_idempotent() {
    let tcx = TypeCtx::default();

    let t = tcx.unsigned(16);
    let c = tcx.const_of(t);
    assert!(c.has_const_flag());
    assert!(Ty::equals(c, tcx.const_of(c)));
    assert!(Ty::equals(t, tcx.const_removed(c)));
    assert!(!Ty::equals(t, c));
}

#[test]
fn const_propagates_into_array_elements() {
    let tcx = TypeCtx::default();

    let arr = tcx.array(tcx.signed(32), 8);
    assert!(!arr.has_const_flag());

    let carr = tcx.const_of(arr);
    assert!(carr.has_const_flag());
    assert!(carr.ref_type().unwrap().has_const_flag());
    assert!(!carr.is_const, "the const flag lives on the element");

    assert!(tcx.assignable(arr));
    assert!(!tcx.assignable(carr));
}

#[test]
fn convert_is_reflexive() {
    let tcx = TypeCtx::default();
    let types = [
        tcx.void(),
        tcx.bool(),
        tcx.signed(8),
        tcx.unsigned(64),
        tcx.double(),
        tcx.pointer(tcx.signed(32)),
        tcx.array(tcx.signed(32), 4),
        tcx.null_pointer(),
    ];
    for t in types {
        assert!(Ty::equals(tcx.convert(t, t).unwrap(), t));
    }
}

#[test]
fn common_is_reflexive_on_scalars() {
    let tcx = TypeCtx::default();
    let types = [tcx.bool(), tcx.signed(16), tcx.unsigned(64), tcx.float()];
    for t in types {
        assert!(Ty::equals(tcx.common(t, t).unwrap(), t));
    }
}

#[test]
fn common_integers_widen_and_unsigned_wins() {
    let tcx = TypeCtx::default();

    let c = tcx.common(tcx.signed(32), tcx.unsigned(16)).unwrap();
    assert!(Ty::equals(c, tcx.unsigned(32)));

    let c = tcx.common(tcx.signed(8), tcx.signed(16)).unwrap();
    assert!(Ty::equals(c, tcx.signed(16)));

    let c = tcx.common(tcx.unsigned(8), tcx.signed(64)).unwrap();
    assert!(Ty::equals(c, tcx.unsigned(64)));
}

#[test]
fn common_floats() {
    let tcx = TypeCtx::default();

    assert!(Ty::equals(
        tcx.common(tcx.float(), tcx.signed(32)).unwrap(),
        tcx.float(),
    ));
    assert!(Ty::equals(
        tcx.common(tcx.signed(32), tcx.double()).unwrap(),
        tcx.double(),
    ));
    assert!(Ty::equals(
        tcx.common(tcx.float(), tcx.double()).unwrap(),
        tcx.double(),
    ));
}

#[test]
fn common_arrays_decay() {
    let tcx = TypeCtx::default();

    let a = tcx.array(tcx.signed(16), 8);
    let b = tcx.array(tcx.signed(16), 4);
    let c = tcx.common(a, b).unwrap();
    assert!(Ty::equals(c, tcx.pointer(tcx.signed(16))));

    let other = tcx.array(tcx.unsigned(16), 8);
    assert!(tcx.common(a, other).is_none());
}

#[test]
fn null_pointer_converts_to_every_pointer() {
    let tcx = TypeCtx::default();

    let null = tcx.null_pointer();
    let p = tcx.pointer(tcx.signed(32));
    let q = tcx.pointer(tcx.pointer(tcx.void()));

    assert!(Ty::equals(tcx.convert(null, p).unwrap(), p));
    assert!(Ty::equals(tcx.convert(null, q).unwrap(), q));
    assert!(Ty::equals(tcx.common(p, null).unwrap(), p));
    assert!(Ty::equals(tcx.common(null, q).unwrap(), q));

    assert!(null.is_pointer());
    assert!(null.ref_type().is_none());
    assert!(tcx.convert(p, null).is_none());
}

#[test]
fn pointer_conversions() {
    let tcx = TypeCtx::default();

    let p_i32 = tcx.pointer(tcx.signed(32));
    let p_u32 = tcx.pointer(tcx.unsigned(32));
    let p_void = tcx.pointer(tcx.void());

    /* unrelated referenced types only cast explicitly */
    assert!(tcx.convert(p_i32, p_u32).is_none());
    assert!(tcx.explicit_cast(p_i32, p_u32).is_some());

    /* void pointers convert both ways */
    assert!(tcx.convert(p_i32, p_void).is_some());
    assert!(tcx.convert(p_void, p_i32).is_some());

    /* pointer/integer round trips are explicit-only */
    assert!(tcx.convert(p_i32, tcx.unsigned(64)).is_none());
    assert!(tcx.explicit_cast(p_i32, tcx.unsigned(64)).is_some());
    assert!(tcx.explicit_cast(tcx.unsigned(64), p_i32).is_some());
}

#[test]
fn array_to_pointer_conversion_checks_elements() {
    let tcx = TypeCtx::default();

    let arr = tcx.array(tcx.signed(16), 8);
    assert!(tcx.convert(arr, tcx.pointer(tcx.signed(16))).is_some());
    assert!(tcx.convert(arr, tcx.pointer(tcx.unsigned(16))).is_none());
    assert!(tcx.convert(arr, tcx.pointer(tcx.void())).is_some());

    /* unbound target accepts any dimension */
    let unbound = tcx.array(tcx.signed(16), 0);
    assert!(tcx.convert(arr, unbound).is_some());
    let bound4 = tcx.array(tcx.signed(16), 4);
    assert!(tcx.convert(arr, bound4).is_none());
}

#[test]
fn struct_completion_is_one_shot() {
    let tcx = TypeCtx::default();
    let name = session::intern("node");

    let node = tcx.struct_incomplete(name);
    assert!(!node.struct_def().unwrap().is_complete());

    /* recursive struct through a pointer to the incomplete type */
    let fields = [
        Field { name: session::intern("value"), ty: tcx.signed(64) },
        Field { name: session::intern("next"), ty: tcx.pointer(node) },
    ];
    assert!(tcx.complete_struct(node, fields).is_some());

    let def = node.struct_def().unwrap();
    assert!(def.is_complete());
    assert_eq!(def.member_index(session::intern("next")), Some(1));
    assert!(Ty::equals(
        def.member_type(session::intern("value")).unwrap(),
        tcx.signed(64),
    ));

    /* re-completion fails and leaves the member table untouched */
    let again = [Field { name: session::intern("value"), ty: tcx.bool() }];
    assert!(tcx.complete_struct(node, again).is_none());
    assert_eq!(def.members().unwrap().len(), 2);
}

#[test]
fn same_name_structs_are_distinct() {
    let tcx = TypeCtx::default();
    let name = session::intern("point");

    let a = tcx.struct_incomplete(name);
    let b = tcx.struct_incomplete(name);
    assert!(!Ty::equals(a, b));
    assert!(tcx.convert(a, b).is_none());

    /* the const flavor shares the definition */
    let ca = tcx.const_of(a);
    assert!(core::ptr::eq(a.struct_def().unwrap(), ca.struct_def().unwrap()));
}

#[test]
fn alias_delegates_everything_but_printing() {
    let tcx = TypeCtx::default();

    let alias = tcx.alias_of(session::intern("word"), tcx.unsigned(32));
    assert!(alias.is_integer());
    assert!(alias.is_unsigned_integer());
    assert_eq!(alias.num_bits(), 32);
    assert!(!Ty::equals(alias, tcx.unsigned(32)));

    assert_eq!(alias.to_string(), "word (aka 'u32')");
    assert!(Ty::equals(tcx.convert(alias, tcx.unsigned(32)).unwrap(), tcx.unsigned(32)));

    let char_ty = tcx.char_type();
    assert_eq!(char_ty.to_string(), "char (aka 'u8')");
    assert_eq!(char_ty.num_bits(), 8);
}

#[test]
fn patch_unbound_arrays() {
    let tcx = TypeCtx::default();

    let unbound = tcx.array(tcx.signed(8), 0);
    assert!(unbound.is_unbound_array());

    let patched = tcx.patch_unbound(unbound, 16);
    assert_eq!(patched.dim(), 16);
    assert!(Ty::equals(patched, tcx.array(tcx.signed(8), 16)));

    /* anything else passes through */
    assert!(Ty::equals(tcx.patch_unbound(patched, 4), patched));
    assert!(Ty::equals(tcx.patch_unbound(tcx.bool(), 4), tcx.bool()));
}

#[test]
fn enums_answer_integer_queries() {
    let tcx = TypeCtx::default();

    let color = tcx.enum_incomplete(session::intern("color"), tcx.unsigned(8));
    assert!(color.is_integer());
    assert!(color.is_unsigned_integer());
    assert_eq!(color.num_bits(), 8);

    use semantic::EnumConstant;
    let constants = [
        EnumConstant { name: session::intern("red"), value: 0 },
        EnumConstant { name: session::intern("green"), value: 1 },
    ];
    assert!(tcx.complete_enum(color, constants).is_some());
    assert!(tcx.complete_enum(color, []).is_none());

    let c = tcx.common(color, tcx.signed(32)).unwrap();
    assert!(Ty::equals(c, tcx.unsigned(32)));
}
