//! Shared program fixtures for the solver scenario tests

use pta_core::{CallKind, ClassId, Invoke, MethodId, Program, Stmt, StmtRef, VarId};

/// The diamond hierarchy from the dispatch scenarios:
/// interface Number { get() } with implementors Zero, One, Two and a
/// subclass Three extends Two overriding get().
pub struct DiamondProgram {
    pub program: Program,
    pub main: MethodId,
    pub get_impls: [MethodId; 4], // [Zero.get, One.get, Two.get, Three.get]
    pub call_site: StmtRef,
    pub result_var: VarId,
}

pub fn diamond_program() -> DiamondProgram {
    let mut p = Program::new();
    let number = p.add_interface("Number");
    p.add_abstract_method(number, "get");

    let mut get_impls = [0; 4];
    let mut classes = [0; 4];
    for (i, name) in ["Zero", "One", "Two"].iter().enumerate() {
        let c = p.add_class(*name, None);
        p.add_implements(c, number);
        let get = p.add_method(c, "get", false);
        let v = p.add_var(get, "v");
        p.push_stmt(get, Stmt::New { lhs: v, class: c });
        p.add_ret(get, v);
        classes[i] = c;
        get_impls[i] = get;
    }
    let three = p.add_class("Three", Some(classes[2]));
    let three_get = p.add_method(three, "get", false);
    let v = p.add_var(three_get, "v");
    p.push_stmt(three_get, Stmt::New { lhs: v, class: three });
    p.add_ret(three_get, v);
    get_impls[3] = three_get;

    // main: n = new One(); r = n.get()   (call through the interface)
    let main_class = p.add_class("Main", None);
    let main = p.add_method(main_class, "main", true);
    let n = p.add_var(main, "n");
    let r = p.add_var(main, "r");
    p.push_stmt(main, Stmt::New { lhs: n, class: classes[1] });
    let call_site = p.push_stmt(
        main,
        Stmt::Invoke(Invoke {
            kind: CallKind::Interface,
            recv: Some(n),
            class: number,
            signature: "get".into(),
            args: vec![],
            result: Some(r),
        }),
    );

    DiamondProgram {
        program: p,
        main,
        get_impls,
        call_site,
        result_var: r,
    }
}

/// A Box container exercised from two receivers:
/// b1.set(o1); b2.set(o2); x = b1.get(); y = b2.get();
pub struct BoxProgram {
    pub program: Program,
    pub main: MethodId,
    pub o1: VarId,
    pub o2: VarId,
    pub x: VarId,
    pub y: VarId,
}

pub fn box_program() -> BoxProgram {
    let mut p = Program::new();
    let a = p.add_class("A", None);
    let b = p.add_class("B", None);

    let boxc = p.add_class("Box", None);
    let f = p.add_field(boxc, "f", false);
    let set = p.add_method(boxc, "set", false);
    let set_this = p.method(set).this.unwrap();
    let set_p = p.add_param(set, "p");
    p.push_stmt(
        set,
        Stmt::StoreField {
            base: set_this,
            field: f,
            rhs: set_p,
        },
    );
    let get = p.add_method(boxc, "get", false);
    let get_this = p.method(get).this.unwrap();
    let get_r = p.add_var(get, "r");
    p.push_stmt(
        get,
        Stmt::LoadField {
            lhs: get_r,
            base: get_this,
            field: f,
        },
    );
    p.add_ret(get, get_r);

    let main_class = p.add_class("Main", None);
    let main = p.add_method(main_class, "main", true);
    let b1 = p.add_var(main, "b1");
    let b2 = p.add_var(main, "b2");
    let o1 = p.add_var(main, "o1");
    let o2 = p.add_var(main, "o2");
    let x = p.add_var(main, "x");
    let y = p.add_var(main, "y");
    p.push_stmt(main, Stmt::New { lhs: b1, class: boxc });
    p.push_stmt(main, Stmt::New { lhs: b2, class: boxc });
    p.push_stmt(main, Stmt::New { lhs: o1, class: a });
    p.push_stmt(main, Stmt::New { lhs: o2, class: b });
    for (recv, arg) in [(b1, o1), (b2, o2)] {
        p.push_stmt(
            main,
            Stmt::Invoke(Invoke {
                kind: CallKind::Virtual,
                recv: Some(recv),
                class: boxc,
                signature: "set".into(),
                args: vec![arg],
                result: None,
            }),
        );
    }
    for (recv, result) in [(b1, x), (b2, y)] {
        p.push_stmt(
            main,
            Stmt::Invoke(Invoke {
                kind: CallKind::Virtual,
                recv: Some(recv),
                class: boxc,
                signature: "get".into(),
                args: vec![],
                result: Some(result),
            }),
        );
    }

    BoxProgram {
        program: p,
        main,
        o1,
        o2,
        x,
        y,
    }
}

/// Helper for building static calls in fixtures
pub fn static_call(
    class: ClassId,
    signature: &str,
    args: Vec<VarId>,
    result: Option<VarId>,
) -> Stmt {
    Stmt::Invoke(Invoke {
        kind: CallKind::Static,
        recv: None,
        class,
        signature: signature.into(),
        args,
        result,
    })
}
