//! Toggle coverage: eligibility, type decomposition and shadow variables.

mod common;

use aion_coverage::errors::F300;
use aion_ir::{
    Access, BasicKind, CoverCategory, CoverToggle, DType, DTypeId, Expr, Member, Module, Node,
    Range, Var, VarDecl, VarId, VarKind,
};
use aion_diagnostics::Severity;
use common::*;

fn toggles(module: &Module) -> Vec<&CoverToggle> {
    module
        .items
        .iter()
        .filter_map(|n| match n {
            Node::CoverToggle(t) => Some(t),
            _ => None,
        })
        .collect()
}

fn toggle_comments(module: &Module) -> Vec<String> {
    toggles(module)
        .iter()
        .map(|t| module.cover_decls[t.inc.decl].comment.clone())
        .collect()
}

fn shadows(fx: &Fixture, module: &Module) -> Vec<VarId> {
    module
        .vars
        .iter()
        .filter(|(_, v)| fx.interner.resolve(v.name).starts_with("__Vtogcov__"))
        .map(|(id, _)| id)
        .collect()
}

fn signal(fx: &Fixture, name: &str, dtype: DTypeId, line: u32) -> Var {
    Var::new(fx.interner.get_or_intern(name), dtype, VarKind::Variable, fx.at(line))
}

#[test]
fn packed_struct_fans_out_per_bit_with_one_shadow() {
    let mut fx = Fixture::new();
    let nibble = fx.design.types.logic_vec(4);
    let byte = fx.design.types.logic_vec(8);
    let pkt_t = fx.design.types.intern(DType::Struct {
        name: fx.interner.get_or_intern("pkt_t"),
        packed: true,
        members: vec![
            Member {
                name: fx.interner.get_or_intern("a"),
                dtype: nibble,
                lsb: 8,
            },
            Member {
                name: fx.interner.get_or_intern("b"),
                dtype: byte,
                lsb: 0,
            },
        ],
    });
    let mut m = fx.module("m", vec![]);
    let pkt = m.add_var(signal(&fx, "pkt", pkt_t, 3));
    fx.design.modules.push(m);
    let stats = fx.run(&toggle_config()).unwrap();

    let m = &fx.design.modules[0];
    assert_eq!(stats.toggle_points, 12);
    assert_eq!(stats.shadow_vars, 1);

    let shadow_ids = shadows(&fx, m);
    assert_eq!(shadow_ids.len(), 1);
    let shadow = shadow_ids[0];
    assert_eq!(fx.var_name(m, shadow), "__Vtogcov__pkt");
    assert_eq!(m.vars[shadow].kind, VarKind::ModuleTemp);
    assert_eq!(m.vars[shadow].dtype, pkt_t);
    assert!(m.vars[shadow].lint_unused_off);

    let mut expected = Vec::new();
    expected.extend((0..4).map(|i| format!("pkt.a[{i}]")));
    expected.extend((0..8).map(|i| format!("pkt.b[{i}]")));
    assert_eq!(toggle_comments(m), expected);

    let lanes = toggles(m);
    assert_eq!(lanes[0].current, Expr::read(pkt).sel(8, 4).sel(0, 1));
    assert_eq!(lanes[0].previous, Expr::read(shadow).sel(8, 4).sel(0, 1));
    assert_eq!(lanes[11].current, Expr::read(pkt).sel(0, 8).sel(7, 1));

    let mut slices: Vec<_> = lanes
        .iter()
        .map(|t| match &t.current {
            Expr::Sel { from, lsb, .. } => match from.as_ref() {
                Expr::Sel { lsb: field, width, .. } => (*field, *width, *lsb),
                other => panic!("unexpected select base {other:?}"),
            },
            other => panic!("unexpected lane {other:?}"),
        })
        .collect();
    slices.dedup();
    assert_eq!(slices.len(), 12);
    assert!(slices[..4].iter().all(|&(lsb, w, _)| lsb == 8 && w == 4));
    assert!(slices[4..].iter().all(|&(lsb, w, _)| lsb == 0 && w == 8));

    let decl = &m.cover_decls[lanes[0].inc.decl];
    assert_eq!(decl.category, CoverCategory::Toggle);
    assert_eq!(decl.page, "v_toggle/m");
    assert_eq!(decl.line_ranges, "");
    assert_eq!(decl.span, fx.at(3));
}

#[test]
fn each_toggle_is_followed_by_its_shadow_update() {
    let mut fx = Fixture::new();
    let vec3 = fx.design.types.logic_vec(3);
    let mut m = fx.module("m", vec![]);
    let v = m.add_var(signal(&fx, "v", vec3, 2));
    fx.design.modules.push(m);
    fx.run(&toggle_config()).unwrap();

    let m = &fx.design.modules[0];
    let shadow = shadows(&fx, m)[0];
    // Declaration, shadow declaration, then toggle/update pairs.
    assert_eq!(m.items.len(), 2 + 3 * 2);
    assert!(matches!(m.items[1], Node::Var(VarDecl { var, .. }) if var == shadow));
    for (bit, pair) in m.items[2..].chunks(2).enumerate() {
        let bit = bit as u32;
        let Node::CoverToggle(t) = &pair[0] else {
            panic!("expected a toggle");
        };
        let Node::Assign(update) = &pair[1] else {
            panic!("expected the shadow update");
        };
        assert_eq!(t.current, Expr::read(v).sel(bit, 1));
        assert_eq!(update.target, Expr::write(shadow).sel(bit, 1));
        assert_eq!(update.value, t.current);
        assert!(matches!(
            update.target.root_var(),
            Some(id) if id == shadow
        ));
        assert!(matches!(
            update.target,
            Expr::Sel { ref from, .. } if matches!(**from, Expr::VarRef { access: Access::Write, .. })
        ));
    }
}

#[test]
fn union_covers_first_member_only() {
    let mut fx = Fixture::new();
    let nibble = fx.design.types.logic_vec(4);
    let byte = fx.design.types.logic_vec(8);
    let u_t = fx.design.types.intern(DType::Union {
        name: fx.interner.get_or_intern("u_t"),
        members: vec![
            Member {
                name: fx.interner.get_or_intern("a"),
                dtype: nibble,
                lsb: 0,
            },
            Member {
                name: fx.interner.get_or_intern("b"),
                dtype: byte,
                lsb: 0,
            },
        ],
    });
    let mut m = fx.module("m", vec![]);
    let u = m.add_var(signal(&fx, "u", u_t, 3));
    fx.design.modules.push(m);
    fx.run(&toggle_config()).unwrap();

    let m = &fx.design.modules[0];
    assert_eq!(toggle_comments(m), ["u.a[0]", "u.a[1]", "u.a[2]", "u.a[3]"]);
    assert_eq!(toggles(m)[2].current, Expr::read(u).sel(2, 1));
}

#[test]
fn aliases_resolve_and_declared_indices_are_kept() {
    let mut fx = Fixture::new();
    let raw = fx.design.types.intern(DType::Basic {
        kind: BasicKind::Logic,
        range: Some(Range::new(5, 3)),
    });
    let alias = fx.design.types.intern(DType::Typedef {
        name: fx.interner.get_or_intern("idx_t"),
        target: raw,
    });
    let state_t = fx.design.types.intern(DType::Enum {
        name: fx.interner.get_or_intern("state_t"),
        base: raw,
    });
    let mut m = fx.module("m", vec![]);
    let idx = m.add_var(signal(&fx, "idx", alias, 2));
    m.add_var(signal(&fx, "state", state_t, 3));
    fx.design.modules.push(m);
    fx.run(&toggle_config()).unwrap();

    let m = &fx.design.modules[0];
    assert_eq!(
        toggle_comments(m),
        ["idx[3]", "idx[4]", "idx[5]", "state[3]", "state[4]", "state[5]"]
    );
    assert_eq!(toggles(m)[2].current, Expr::read(idx).sel(2, 1));
}

#[test]
fn unpacked_arrays_select_elements() {
    let mut fx = Fixture::new();
    let pair = fx.design.types.logic_vec(2);
    let mem_t = fx.design.types.intern(DType::UnpackedArray {
        elem: pair,
        range: Range::new(0, 1),
    });
    let mut m = fx.module("m", vec![]);
    let mem = m.add_var(signal(&fx, "mem", mem_t, 2));
    fx.design.modules.push(m);
    fx.run(&toggle_config()).unwrap();

    let m = &fx.design.modules[0];
    assert_eq!(
        toggle_comments(m),
        ["mem[0][0]", "mem[0][1]", "mem[1][0]", "mem[1][1]"]
    );
    let shadow = shadows(&fx, m)[0];
    assert_eq!(toggles(m)[2].current, Expr::read(mem).array_sel(1).sel(0, 1));
    assert_eq!(toggles(m)[2].previous, Expr::read(shadow).array_sel(1).sel(0, 1));
}

#[test]
fn undecomposable_type_is_fatal() {
    let mut fx = Fixture::new();
    let bit = fx.design.types.logic_bit();
    let queue = fx.design.types.intern(DType::Queue { elem: bit });
    let mut m = fx.module("m", vec![]);
    m.add_var(signal(&fx, "pending_q", queue, 7));
    fx.design.modules.push(m);

    let err = fx.run(&toggle_config()).unwrap_err();
    assert!(err.message.contains("pending_q"));
    assert!(fx.sink.has_fatal());
    let diags = fx.sink.diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, F300);
    assert_eq!(diags[0].severity, Severity::Fatal);
    assert_eq!(diags[0].primary_span, fx.at(7));
    assert!(diags[0].message.contains("queue"));
}

#[test]
fn ineligible_variables_are_skipped() {
    let mut fx = Fixture::new();
    let byte = fx.design.types.logic_vec(8);
    let wide = fx.design.types.logic_vec(300);
    let real = fx.design.types.intern(DType::Basic {
        kind: BasicKind::Real,
        range: None,
    });
    let mut m = fx.module("m", vec![]);
    m.add_var(signal(&fx, "_hidden", byte, 2));
    m.add_var(signal(&fx, "u_sub__DOT___x", byte, 3));
    m.add_var(signal(&fx, "bus", wide, 4));
    m.add_var(signal(&fx, "ratio", real, 5));
    m.add_var(Var::new(
        fx.interner.get_or_intern("WIDTH"),
        byte,
        VarKind::Parameter,
        fx.at(6),
    ));
    fx.design.modules.push(m);
    let stats = fx.run(&toggle_config()).unwrap();

    assert_eq!(stats.toggle_points, 0);
    assert_eq!(stats.shadow_vars, 0);
    assert_eq!(stats.toggle_skipped, 5);
}

#[test]
fn underscore_names_are_covered_when_allowed() {
    let mut fx = Fixture::new();
    let bit = fx.design.types.logic_bit();
    let mut m = fx.module("m", vec![]);
    m.add_var(signal(&fx, "_hidden", bit, 2));
    m.add_var(signal(&fx, "u_sub__DOT___x", bit, 3));
    fx.design.modules.push(m);
    let config = aion_config::CoverageConfig {
        underscore: true,
        ..toggle_config()
    };
    fx.run(&config).unwrap();

    let m = &fx.design.modules[0];
    assert_eq!(toggle_comments(m), ["_hidden", "u_sub._x"]);
    let names: Vec<_> = shadows(&fx, m)
        .into_iter()
        .map(|id| fx.var_name(m, id).to_string())
        .collect();
    assert_eq!(names, ["__Vtogcov___hidden", "__Vtogcov__u_sub__DOT___x"]);
}

#[test]
fn max_width_is_configurable() {
    let mut fx = Fixture::new();
    let byte = fx.design.types.logic_vec(8);
    let mut m = fx.module("m", vec![]);
    m.add_var(signal(&fx, "data", byte, 2));
    fx.design.modules.push(m);
    let config = aion_config::CoverageConfig {
        max_width: 4,
        ..toggle_config()
    };
    let stats = fx.run(&config).unwrap();
    assert_eq!(stats.toggle_points, 0);
    assert_eq!(stats.toggle_skipped, 1);
}

#[test]
fn enormous_variables_are_too_wide() {
    let mut fx = Fixture::new();
    let bit = fx.design.types.logic_bit();
    let row = fx.design.types.intern(DType::UnpackedArray {
        elem: bit,
        range: Range::new(0, 65535),
    });
    let mem = fx.design.types.intern(DType::UnpackedArray {
        elem: row,
        range: Range::new(0, 65535),
    });
    let wide = fx.design.types.logic_vec(65536);
    let bus = fx.design.types.intern(DType::PackedArray {
        elem: wide,
        range: Range::new(65535, 0),
    });
    let mut m = fx.module("m", vec![]);
    m.add_var(signal(&fx, "mem", mem, 2));
    m.add_var(signal(&fx, "bus", bus, 3));
    fx.design.modules.push(m);
    let config = aion_config::CoverageConfig {
        max_width: u32::MAX,
        ..toggle_config()
    };
    let stats = fx.run(&config).unwrap();

    assert_eq!(stats.toggle_skipped, 2);
    assert_eq!(stats.toggle_points, 0);
    assert_eq!(stats.shadow_vars, 0);
    assert!(shadows(&fx, &fx.design.modules[0]).is_empty());
}

#[test]
fn only_module_scope_variables_toggle() {
    let mut fx = Fixture::new();
    let bit = fx.design.types.logic_bit();
    let mut m = fx.module("m", vec![]);

    let local = m.vars.alloc(signal(&fx, "local", bit, 3));
    let in_block = m.vars.alloc(signal(&fx, "in_block", bit, 6));
    m.items.push(always(
        fx.at(2),
        vec![Node::Var(VarDecl {
            var: local,
            span: fx.at(3),
        })],
    ));
    m.items.push(begin(
        Some("g"),
        &fx.interner,
        fx.at(5),
        vec![Node::Var(VarDecl {
            var: in_block,
            span: fx.at(6),
        })],
    ));
    let quiet = signal(&fx, "quiet", bit, 8);
    let quiet_span = quiet.span.without_coverage();
    let quiet = m.vars.alloc(Var {
        span: quiet_span,
        ..quiet
    });
    m.items.push(Node::Var(VarDecl {
        var: quiet,
        span: quiet_span,
    }));
    m.add_var(signal(&fx, "top_level", bit, 9));
    fx.design.modules.push(m);

    let mut wrapper = fx.module("$root", vec![]);
    wrapper.is_top = true;
    wrapper.add_var(signal(&fx, "clk", bit, 1));
    fx.design.modules.push(wrapper);

    let stats = fx.run(&toggle_config()).unwrap();
    assert_eq!(toggle_comments(&fx.design.modules[0]), ["top_level"]);
    assert!(toggles(&fx.design.modules[1]).is_empty());
    assert_eq!(stats.toggle_points, 1);
}

#[test]
fn toggle_disabled_adds_nothing() {
    let mut fx = Fixture::new();
    let byte = fx.design.types.logic_vec(8);
    let mut m = fx.module("m", vec![]);
    m.add_var(signal(&fx, "data", byte, 2));
    fx.design.modules.push(m);
    let stats = fx.run(&line_config()).unwrap();
    assert_eq!(stats.toggle_points, 0);
    assert_eq!(fx.design.modules[0].items.len(), 1);
}
