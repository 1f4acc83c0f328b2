//! Triple and quintuple iteration over a shared memory.

use pretty_assertions::assert_eq;
use semnet_tests::prelude::*;

const EDGE: ElementType = ElementType::EDGE_ACCESS_CONST_POS_PERM;

struct Triple {
    ctx: MemoryContext,
    src: Addr,
    edge: Addr,
    tgt: Addr,
}

fn single_edge() -> Triple {
    let ctx = manual_memory().context("iterators");
    let src = ctx.create_node(ElementType::NODE_CONST);
    let tgt = ctx.create_node(ElementType::NODE_CONST);
    let edge = ctx.create_edge(EDGE, src, tgt);
    Triple { ctx, src, edge, tgt }
}

fn count3(mut it: Iterator3) -> usize {
    let mut rows = 0;
    while it.next() {
        rows += 1;
    }
    rows
}

fn count5(mut it: Iterator5) -> usize {
    let mut rows = 0;
    while it.next() {
        rows += 1;
    }
    rows
}

mod iterator3 {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_consistent_shape_finds_the_edge() {
        let t = single_edge();
        let shapes: Vec<[IterParam; 3]> = vec![
            [t.src.into(), EDGE.into(), t.tgt.into()],
            [t.src.into(), EDGE.into(), ElementType::NODE.into()],
            [ElementType::NODE.into(), EDGE.into(), t.tgt.into()],
            [ElementType::NODE.into(), t.edge.into(), ElementType::NODE.into()],
            [t.src.into(), t.edge.into(), t.tgt.into()],
            [t.src.into(), t.edge.into(), ElementType::UNKNOWN.into()],
            [ElementType::UNKNOWN.into(), ElementType::EDGE_ACCESS.into(), t.tgt.into()],
        ];

        for shape in shapes {
            let mut it = t.ctx.iterator3(shape[0], shape[1], shape[2]);
            assert!(it.is_valid());
            assert!(it.next(), "no row for {shape:?}");
            assert_eq!(it.row(), Some([t.src, t.edge, t.tgt]));
            assert_eq!(it.get(0), t.src);
            assert_eq!(it.get(1), t.edge);
            assert_eq!(it.get(2), t.tgt);
            assert!(!it.next(), "second row for {shape:?}");
        }
    }

    #[test]
    fn test_inconsistent_shapes_find_nothing() {
        let t = single_edge();

        assert_eq!(count3(t.ctx.iterator3(t.tgt, EDGE, t.src)), 0);
        assert_eq!(
            count3(t.ctx.iterator3(t.src, ElementType::EDGE_DCOMMON, ElementType::NODE)),
            0
        );
        assert_eq!(
            count3(t.ctx.iterator3(t.src, ElementType::EDGE_ACCESS_CONST_NEG_PERM, t.tgt)),
            0
        );
        assert_eq!(count3(t.ctx.iterator3(t.src, t.edge, t.src)), 0);
        assert_eq!(count3(t.ctx.iterator3(t.src, EDGE, ElementType::LINK)), 0);
    }

    #[test]
    fn test_unanchored_shape_terminates() {
        let t = single_edge();
        let other = t.ctx.create_node(ElementType::NODE_CONST);
        t.ctx.create_edge(ElementType::EDGE_UCOMMON_CONST, t.src, other);
        t.ctx.create_edge(ElementType::EDGE_UCOMMON_CONST, other, t.tgt);

        let rows: Vec<[Addr; 3]> = t
            .ctx
            .iterator3(ElementType::NODE, ElementType::EDGE_UCOMMON_CONST, ElementType::NODE)
            .into_rows()
            .collect();

        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_invalid_params_are_reported() {
        let t = single_edge();

        let it = t.ctx.iterator3(Addr::INVALID, EDGE, t.tgt);
        assert!(!it.is_valid());
        assert_eq!(count3(it), 0);

        let conflicting = ElementType::NODE_CONST.with(ElementType::VAR);
        assert!(!t.ctx.iterator3(conflicting, EDGE, t.tgt).is_valid());
        assert!(Iterator3::try_new(t.ctx.memory().store().clone(), t.src, EDGE, Addr::INVALID).is_err());
    }

    #[test]
    fn test_erased_rows_are_skipped() {
        // GIVEN three edges out of src
        let t = single_edge();
        let second = t.ctx.create_node(ElementType::NODE_CONST);
        let third = t.ctx.create_node(ElementType::NODE_CONST);
        let second_edge = t.ctx.create_edge(EDGE, t.src, second);
        let third_edge = t.ctx.create_edge(EDGE, t.src, third);

        // WHEN one of them is erased after the iterator was built
        let mut it = t.ctx.iterator3(t.src, EDGE, ElementType::NODE);
        assert!(t.ctx.erase_element(second_edge));

        // THEN it is never returned
        let mut seen = Vec::new();
        while it.next() {
            seen.push(it.get(1));
        }
        assert_eq!(seen, vec![t.edge, third_edge]);
    }

    #[test]
    fn test_out_of_range_get_is_invalid() {
        let t = single_edge();
        let mut it = t.ctx.iterator3(t.src, EDGE, t.tgt);

        assert_eq!(it.get(0), Addr::INVALID);
        assert!(it.next());
        assert_eq!(it.get(3), Addr::INVALID);
    }
}

mod iterator5 {
    use super::*;
    use pretty_assertions::assert_eq;

    const ATTR_EDGE: ElementType = ElementType::EDGE_ACCESS_CONST_POS_PERM;
    const REL: ElementType = ElementType::EDGE_DCOMMON_CONST;

    struct Quintuple {
        ctx: MemoryContext,
        src: Addr,
        edge: Addr,
        tgt: Addr,
        attr_edge: Addr,
        attr: Addr,
    }

    fn qualified_edge() -> Quintuple {
        let ctx = manual_memory().context("iterator5");
        let src = ctx.create_node(ElementType::NODE_CONST);
        let tgt = ctx.create_node(ElementType::NODE_CONST);
        let attr = ctx.create_node(ElementType::NODE_CONST_NOROLE);
        let edge = ctx.create_edge(REL, src, tgt);
        let attr_edge = ctx.create_edge(ATTR_EDGE, attr, edge);
        Quintuple {
            ctx,
            src,
            edge,
            tgt,
            attr_edge,
            attr,
        }
    }

    #[test]
    fn test_every_consistent_shape_finds_the_row() {
        let q = qualified_edge();
        let node = IterParam::from(ElementType::NODE);
        let shapes: Vec<[IterParam; 5]> = vec![
            [q.src.into(), REL.into(), q.tgt.into(), ATTR_EDGE.into(), q.attr.into()],
            [q.src.into(), REL.into(), node, ATTR_EDGE.into(), q.attr.into()],
            [node, REL.into(), q.tgt.into(), ATTR_EDGE.into(), q.attr.into()],
            [q.src.into(), REL.into(), q.tgt.into(), ATTR_EDGE.into(), node],
            [q.src.into(), REL.into(), node, ATTR_EDGE.into(), node],
            [node, REL.into(), q.tgt.into(), ATTR_EDGE.into(), node],
            [node, q.edge.into(), node, ATTR_EDGE.into(), node],
            [node, q.edge.into(), node, q.attr_edge.into(), q.attr.into()],
            [q.src.into(), q.edge.into(), q.tgt.into(), q.attr_edge.into(), q.attr.into()],
        ];

        for shape in shapes {
            let mut it = q
                .ctx
                .iterator5(shape[0], shape[1], shape[2], shape[3], shape[4]);
            assert!(it.is_valid());
            assert!(it.next(), "no row for {shape:?}");
            assert_eq!(it.row(), Some([q.src, q.edge, q.tgt, q.attr_edge, q.attr]));
            assert_eq!(it.get(3), q.attr_edge);
            assert_eq!(it.get(4), q.attr);
            assert!(!it.next(), "second row for {shape:?}");
        }
    }

    #[test]
    fn test_unqualified_edges_are_skipped() {
        let q = qualified_edge();
        let plain_tgt = q.ctx.create_node(ElementType::NODE_CONST);
        q.ctx.create_edge(REL, q.src, plain_tgt);

        let it = q
            .ctx
            .iterator5(q.src, REL, ElementType::NODE, ATTR_EDGE, ElementType::NODE);

        assert_eq!(count5(it), 1);
    }

    #[test]
    fn test_inconsistent_shapes_find_nothing() {
        let q = qualified_edge();

        assert_eq!(
            count5(q.ctx.iterator5(q.src, REL, q.tgt, ATTR_EDGE, q.src)),
            0
        );
        assert_eq!(
            count5(q.ctx.iterator5(q.tgt, REL, q.src, ATTR_EDGE, q.attr)),
            0
        );
        assert_eq!(
            count5(q.ctx.iterator5(
                q.src,
                REL,
                q.tgt,
                ElementType::EDGE_ACCESS_CONST_NEG_PERM,
                q.attr
            )),
            0
        );
    }

    #[test]
    fn test_invalid_attribute_param() {
        let q = qualified_edge();

        let it = q
            .ctx
            .iterator5(q.src, REL, q.tgt, ATTR_EDGE, Addr::INVALID);

        assert!(!it.is_valid());
        assert_eq!(count5(it), 0);
    }
}
