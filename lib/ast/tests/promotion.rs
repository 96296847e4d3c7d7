use ast::{Ast, BinaryOp, Expression, ExpressionKind, IdentStorage, UnaryOp};
use error_manager::{Error as _, ErrorManager};
use semantic::{Ty, TypeCtx};
use span::Span;

fn var<'cx>(
    name: &str,
    ty: &'cx Ty<'cx>,
    storage: IdentStorage,
    ast: &Ast<'cx>,
) -> &'cx Expression<'cx> {
    let sym = session::intern(name);
    Expression::identifier(sym, sym, storage, ty, Span::dummy(), ast)
}

fn local<'cx>(name: &str, ty: &'cx Ty<'cx>, ast: &Ast<'cx>) -> &'cx Expression<'cx> {
    var(name, ty, IdentStorage::Local, ast)
}

fn lit<'cx>(digits: &str, ty: &'cx Ty<'cx>, ast: &Ast<'cx>) -> &'cx Expression<'cx> {
    Expression::literal_int(session::intern(digits), 10, ty, Span::dummy(), ast)
}

#[test]
fn integer_arithmetic_common_type() {
    let tcx = TypeCtx::default();
    let ast = Ast::default();
    let mut em = ErrorManager::new();

    let x = local("x", tcx.signed(32), &ast);
    let y = local("y", tcx.unsigned(16), &ast);

    let sum = Expression::binary(
        BinaryOp::Add,
        x,
        y,
        Some(Span::dummy()),
        &ast,
        &tcx,
        &mut em,
    )
    .unwrap();

    /* unsigned wins, max bits is 32; both operands get cast */
    assert!(Ty::equals(sum.ty, tcx.unsigned(32)));
    let ExpressionKind::Binary { left, right, .. } = sum.kind else { panic!() };
    assert!(Ty::equals(left.ty, tcx.unsigned(32)));
    assert!(Ty::equals(right.ty, tcx.unsigned(32)));
    assert!(matches!(left.kind, ExpressionKind::Cast { implicit: true, .. }));
    assert!(matches!(right.kind, ExpressionKind::Cast { implicit: true, .. }));
    assert_eq!(em.n_errors(), 0);
}

#[test]
fn pointer_plus_integer() {
    let tcx = TypeCtx::default();
    let ast = Ast::default();
    let mut em = ErrorManager::new();

    let p = local("p", tcx.pointer(tcx.signed(32)), &ast);
    let three = lit("3", tcx.signed(64), &ast);

    let e = Expression::binary(
        BinaryOp::Add,
        p,
        three,
        Some(Span::dummy()),
        &ast,
        &tcx,
        &mut em,
    )
    .unwrap();
    assert!(Ty::equals(e.ty, tcx.pointer(tcx.signed(32))));

    /* `3 + p` canonicalizes the pointer to the left */
    let e = Expression::binary(
        BinaryOp::Add,
        three,
        p,
        Some(Span::dummy()),
        &ast,
        &tcx,
        &mut em,
    )
    .unwrap();
    assert!(Ty::equals(e.ty, tcx.pointer(tcx.signed(32))));
    let ExpressionKind::Binary { left, .. } = e.kind else { panic!() };
    assert!(left.ty.is_pointer());
    assert_eq!(em.n_errors(), 0);
}

#[test]
fn pointer_minus_pointer() {
    let tcx = TypeCtx::default();
    let ast = Ast::default();
    let mut em = ErrorManager::new();

    let p = local("p", tcx.pointer(tcx.signed(32)), &ast);
    let q = local("q", tcx.pointer(tcx.signed(32)), &ast);

    let e = Expression::binary(
        BinaryOp::Sub,
        p,
        q,
        Some(Span::dummy()),
        &ast,
        &tcx,
        &mut em,
    )
    .unwrap();
    assert!(Ty::equals(e.ty, tcx.signed(64)));
    assert_eq!(em.n_errors(), 0);

    /* different element types do not subtract */
    let r = local("r", tcx.pointer(tcx.unsigned(8)), &ast);
    let e = Expression::binary(BinaryOp::Sub, p, r, None, &ast, &tcx, &mut em);
    assert!(e.is_none());
    assert_eq!(em.n_errors(), 0, "speculative mode stays silent");
}

#[test]
fn array_decays_in_arithmetic() {
    let tcx = TypeCtx::default();
    let ast = Ast::default();
    let mut em = ErrorManager::new();

    let a = local("a", tcx.array(tcx.signed(16), 8), &ast);
    let one = lit("1", tcx.signed(64), &ast);

    let e = Expression::binary(
        BinaryOp::Add,
        a,
        one,
        Some(Span::dummy()),
        &ast,
        &tcx,
        &mut em,
    )
    .unwrap();
    assert!(Ty::equals(e.ty, tcx.pointer(tcx.signed(16))));

    let ExpressionKind::Binary { left, .. } = e.kind else { panic!() };
    assert!(Ty::equals(left.ty, tcx.pointer(tcx.signed(16))));
    assert!(matches!(left.kind, ExpressionKind::Cast { implicit: true, .. }));
    assert_eq!(em.n_errors(), 0);
}

#[test]
fn index_casts_to_size_type() {
    let tcx = TypeCtx::default();
    let ast = Ast::default();
    let mut em = ErrorManager::new();

    let a = local("a", tcx.array(tcx.unsigned(32), 4), &ast);
    let i = local("i", tcx.signed(8), &ast);

    let e = Expression::binary(
        BinaryOp::Index,
        a,
        i,
        Some(Span::dummy()),
        &ast,
        &tcx,
        &mut em,
    )
    .unwrap();
    assert!(Ty::equals(e.ty, tcx.unsigned(32)));
    let ExpressionKind::Binary { right, .. } = e.kind else { panic!() };
    assert!(Ty::equals(right.ty, tcx.size_type()));
    assert!(e.is_lvalue());
    assert!(e.has_address());
    assert_eq!(em.n_errors(), 0);
}

#[test]
fn assignment_to_readonly_is_fatal() {
    let tcx = TypeCtx::default();
    let ast = Ast::default();
    let mut em = ErrorManager::new();

    let c = local("c", tcx.const_of(tcx.signed(32)), &ast);
    let five = lit("5", tcx.signed(64), &ast);

    let e = Expression::binary(
        BinaryOp::Assign,
        c,
        five,
        Some(Span::dummy()),
        &ast,
        &tcx,
        &mut em,
    );
    assert!(e.is_none());
    assert_eq!(em.n_errors(), 1);

    let mut rendered = String::new();
    em.errors()[0].write_msg(&mut rendered).unwrap();
    assert_eq!(rendered, "assignment of read-only variable 'c'");
}

#[test]
fn assignment_requires_lvalue() {
    let tcx = TypeCtx::default();
    let ast = Ast::default();
    let mut em = ErrorManager::new();

    let lhs = lit("1", tcx.signed(32), &ast);
    let rhs = lit("2", tcx.signed(32), &ast);
    let e = Expression::binary(
        BinaryOp::Assign,
        lhs,
        rhs,
        Some(Span::dummy()),
        &ast,
        &tcx,
        &mut em,
    );
    assert!(e.is_none());
    assert_eq!(em.n_errors(), 1);
}

#[test]
fn null_pointer_assignment() {
    let tcx = TypeCtx::default();
    let ast = Ast::default();
    let mut em = ErrorManager::new();

    let p = local("p", tcx.pointer(tcx.signed(32)), &ast);
    let null = Expression::literal_null(tcx.null_pointer(), Span::dummy(), &ast);

    let e = Expression::binary(
        BinaryOp::Assign,
        p,
        null,
        Some(Span::dummy()),
        &ast,
        &tcx,
        &mut em,
    )
    .unwrap();
    assert!(Ty::equals(e.ty, tcx.pointer(tcx.signed(32))));
    assert_eq!(em.n_errors(), 0);
}

#[test]
fn deref_null_pointer_is_diagnosed() {
    let tcx = TypeCtx::default();
    let ast = Ast::default();
    let mut em = ErrorManager::new();

    let null = Expression::literal_null(tcx.null_pointer(), Span::dummy(), &ast);
    let e = Expression::unary(
        UnaryOp::Deref,
        null,
        Some(Span::dummy()),
        &ast,
        &tcx,
        &mut em,
    );
    assert!(e.is_none());
    assert_eq!(em.n_errors(), 1);
}

#[test]
fn logical_not_typing() {
    let tcx = TypeCtx::default();
    let ast = Ast::default();
    let mut em = ErrorManager::new();

    let x = local("x", tcx.signed(32), &ast);
    let e = Expression::unary(UnaryOp::LogicalNot, x, Some(Span::dummy()), &ast, &tcx, &mut em)
        .unwrap();
    assert!(Ty::equals(e.ty, tcx.signed(32)));

    let p = local("p", tcx.pointer(tcx.void()), &ast);
    let e = Expression::unary(UnaryOp::LogicalNot, p, Some(Span::dummy()), &ast, &tcx, &mut em)
        .unwrap();
    assert!(Ty::equals(e.ty, tcx.bool()));
    assert_eq!(em.n_errors(), 0);
}

#[test]
fn address_of_requires_an_address() {
    let tcx = TypeCtx::default();
    let ast = Ast::default();
    let mut em = ErrorManager::new();

    let x = local("x", tcx.signed(8), &ast);
    let e = Expression::unary(UnaryOp::Address, x, Some(Span::dummy()), &ast, &tcx, &mut em)
        .unwrap();
    assert!(Ty::equals(e.ty, tcx.pointer(tcx.signed(8))));

    let one = lit("1", tcx.signed(64), &ast);
    let e = Expression::unary(UnaryOp::Address, one, None, &ast, &tcx, &mut em);
    assert!(e.is_none());
    assert_eq!(em.n_errors(), 0);
}

#[test]
fn call_arity_checks() {
    let tcx = TypeCtx::default();
    let ast = Ast::default();
    let mut em = ErrorManager::new();

    let fn_ty = tcx.function(tcx.signed(32), [tcx.signed(32)], false);
    let f = var("f", fn_ty, IdentStorage::Function, &ast);

    let e = Expression::call(f, vec![], Some(Span::dummy()), &ast, &tcx, &mut em);
    assert!(e.is_none());
    assert_eq!(em.n_errors(), 1);

    let a = lit("1", tcx.signed(64), &ast);
    let b = lit("2", tcx.signed(64), &ast);
    let e = Expression::call(f, vec![a, b], Some(Span::dummy()), &ast, &tcx, &mut em);
    assert!(e.is_none());
    assert_eq!(em.n_errors(), 2);

    let e = Expression::call(f, vec![a], Some(Span::dummy()), &ast, &tcx, &mut em).unwrap();
    assert!(Ty::equals(e.ty, tcx.signed(32)));
    assert_eq!(em.n_errors(), 2);
}

#[test]
fn varg_arrays_decay() {
    let tcx = TypeCtx::default();
    let ast = Ast::default();
    let mut em = ErrorManager::new();

    let fn_ty = tcx.function(tcx.void(), [tcx.signed(32)], true);
    let f = var("f", fn_ty, IdentStorage::Function, &ast);

    let n = lit("1", tcx.signed(64), &ast);
    let arr = local("buf", tcx.array(tcx.unsigned(8), 16), &ast);

    let e = Expression::call(f, vec![n, arr], Some(Span::dummy()), &ast, &tcx, &mut em).unwrap();
    let ExpressionKind::Call { args, .. } = e.kind else { panic!() };
    assert!(Ty::equals(args[1].ty, tcx.pointer(tcx.unsigned(8))));
    assert_eq!(em.n_errors(), 0);
}

#[test]
fn struct_assignment_only_between_equal_structs() {
    let tcx = TypeCtx::default();
    let ast = Ast::default();
    let mut em = ErrorManager::new();

    let name = session::intern("point");
    let point = tcx.struct_incomplete(name);
    tcx.complete_struct(
        point,
        [semantic::Field { name: session::intern("x"), ty: tcx.signed(32) }],
    )
    .unwrap();

    let a = local("a", point, &ast);
    let b = local("b", point, &ast);
    let e = Expression::binary(
        BinaryOp::Assign,
        a,
        b,
        Some(Span::dummy()),
        &ast,
        &tcx,
        &mut em,
    )
    .unwrap();
    assert!(Ty::equals(e.ty, point));

    /* any other operator on structs is illegal */
    let e = Expression::binary(BinaryOp::Add, a, b, None, &ast, &tcx, &mut em);
    assert!(e.is_none());
    assert_eq!(em.n_errors(), 0);
}

#[test]
fn member_access_typing() {
    let tcx = TypeCtx::default();
    let ast = Ast::default();
    let mut em = ErrorManager::new();

    let name = session::intern("pair");
    let pair = tcx.struct_incomplete(name);
    tcx.complete_struct(
        pair,
        [
            semantic::Field { name: session::intern("first"), ty: tcx.signed(32) },
            semantic::Field { name: session::intern("second"), ty: tcx.unsigned(64) },
        ],
    )
    .unwrap();

    let p = local("p", pair, &ast);
    let e = Expression::member(
        p,
        session::intern("second"),
        Some(Span::dummy()),
        &ast,
        &tcx,
        &mut em,
    )
    .unwrap();
    assert!(Ty::equals(e.ty, tcx.unsigned(64)));
    assert!(e.is_lvalue());
    assert!(e.has_address());

    /* members of a read-only record are read-only */
    let cp = local("cp", tcx.const_of(pair), &ast);
    let e = Expression::member(
        cp,
        session::intern("first"),
        Some(Span::dummy()),
        &ast,
        &tcx,
        &mut em,
    )
    .unwrap();
    assert!(e.ty.has_const_flag());

    let e = Expression::member(p, session::intern("third"), None, &ast, &tcx, &mut em);
    assert!(e.is_none());
    assert_eq!(em.n_errors(), 0);
}

#[test]
fn proxies_delegate_queries() {
    let tcx = TypeCtx::default();
    let ast = Ast::default();
    let mut em = ErrorManager::new();

    let x = local("x", tcx.signed(32), &ast);
    let p = Expression::proxy(x, &ast);
    assert!(p.has_address());
    assert!(p.is_lvalue());
    assert!(!p.is_const());

    let n = lit("7", tcx.signed(32), &ast);
    let p = Expression::proxy(n, &ast);
    assert!(p.is_const());
    assert_eq!(p.const_int_value(&mut em), Some(7));
    assert!(!p.has_address());
}

#[test]
fn constants_wrap_at_their_width() {
    let tcx = TypeCtx::default();
    let ast = Ast::default();
    let mut em = ErrorManager::new();

    let big = lit("300", tcx.unsigned(8), &ast);
    assert_eq!(big.const_int_value(&mut em), Some(44));

    let a = lit("200", tcx.signed(8), &ast);
    assert_eq!(a.const_int_value(&mut em), Some(-56));

    /* arithmetic happens at the promoted width */
    let x = lit("250", tcx.unsigned(8), &ast);
    let y = lit("10", tcx.unsigned(8), &ast);
    let sum = Expression::binary(
        BinaryOp::Add,
        x,
        y,
        Some(Span::dummy()),
        &ast,
        &tcx,
        &mut em,
    )
    .unwrap();
    assert!(sum.is_const());
    assert_eq!(sum.const_int_value(&mut em), Some(4));
    assert_eq!(em.n_errors(), 0);
}

#[test]
fn constant_division_by_zero_is_diagnosed() {
    let tcx = TypeCtx::default();
    let ast = Ast::default();
    let mut em = ErrorManager::new();

    let one = lit("1", tcx.signed(32), &ast);
    let zero = lit("0", tcx.signed(32), &ast);
    let div = Expression::binary(
        BinaryOp::Div,
        one,
        zero,
        Some(Span::dummy()),
        &ast,
        &tcx,
        &mut em,
    )
    .unwrap();

    assert!(div.is_const());
    assert_eq!(div.const_int_value(&mut em), None);
    assert_eq!(em.n_errors(), 1);
}

#[test]
fn calls_and_assignments_are_never_const() {
    let tcx = TypeCtx::default();
    let ast = Ast::default();
    let mut em = ErrorManager::new();

    let fn_ty = tcx.function(tcx.signed(32), [], false);
    let f = var("f", fn_ty, IdentStorage::Function, &ast);
    let call = Expression::call(f, vec![], Some(Span::dummy()), &ast, &tcx, &mut em).unwrap();
    assert!(!call.is_const());

    let x = local("x", tcx.signed(32), &ast);
    let one = lit("1", tcx.signed(64), &ast);
    let assign = Expression::binary(
        BinaryOp::Assign,
        x,
        one,
        Some(Span::dummy()),
        &ast,
        &tcx,
        &mut em,
    )
    .unwrap();
    assert!(!assign.is_const());
    assert!(assign.has_address());
    assert!(!assign.is_lvalue());
}
