//! Template generation, search and structure reconstruction.

use pretty_assertions::assert_eq;
use semnet_tests::prelude::*;

const MEMBERSHIP: ElementType = ElementType::EDGE_ACCESS_CONST_POS_PERM;

fn ctx() -> MemoryContext {
    manual_memory().context("templates")
}

mod generation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_generate_then_search_gives_equal_bindings() {
        // GIVEN a template hanging a new edge and target off a known node
        let ctx = ctx();
        let src = ctx.create_node(ElementType::NODE_CONST);
        let mut templ = Template::new();
        templ.triple(
            src.alias("_src"),
            ElementType::EDGE_ACCESS_VAR_POS_PERM.alias("_edge"),
            ElementType::NODE_VAR.alias("_tgt"),
        );

        // WHEN it is generated and then searched
        let generated = ctx.generate(&templ, &TemplateParams::new()).unwrap();
        let found = ctx.search(&templ).unwrap();

        // THEN exactly one match with the same bindings
        assert_eq!(found.size(), 1);
        assert_eq!(found[0]["_src"], src);
        assert_eq!(found[0]["_edge"], generated["_edge"]);
        assert_eq!(found[0]["_tgt"], generated["_tgt"]);
        assert_eq!(found[0].triples(), generated.triples());
    }

    #[test]
    fn test_generated_elements_have_requested_types() {
        let ctx = ctx();
        let src = ctx.create_node(ElementType::NODE_CONST);
        let mut templ = Template::new();
        templ.triple(
            src,
            ElementType::EDGE_DCOMMON_VAR.alias("_edge"),
            ElementType::NODE_VAR_STRUCT.alias("_tgt"),
        );

        let generated = ctx.generate(&templ, &TemplateParams::new()).unwrap();

        assert_eq!(
            ctx.element_type(generated["_edge"]),
            ElementType::EDGE_DCOMMON_VAR
        );
        assert_eq!(
            ctx.element_type(generated["_tgt"]),
            ElementType::NODE_VAR_STRUCT
        );
        assert_eq!(ctx.edge_info(generated["_edge"]), Some((src, generated["_tgt"])));
    }

    #[test]
    fn test_aliases_are_shared_between_triples() {
        let ctx = ctx();
        let class = ctx.create_node(ElementType::NODE_CONST_CLASS);
        let relation = ctx.create_node(ElementType::NODE_CONST_NOROLE);
        let mut templ = Template::new();
        templ
            .triple(class, MEMBERSHIP, ElementType::NODE_CONST.alias("_item"))
            .triple(
                "_item",
                ElementType::EDGE_DCOMMON_CONST.alias("_pair"),
                ElementType::NODE_CONST.alias("_value"),
            )
            .triple(relation, MEMBERSHIP, "_pair");

        let generated = ctx.generate(&templ, &TemplateParams::new()).unwrap();

        assert_eq!(generated.triples().len(), 3);
        assert_eq!(generated.triples()[1][0], generated["_item"]);
        assert_eq!(generated.triples()[2][2], generated["_pair"]);
        assert!(ctx.check_edge(relation, generated["_pair"], MEMBERSHIP));
    }

    #[test]
    fn test_relation_shorthand() {
        let ctx = ctx();
        let attr = ctx.create_node(ElementType::NODE_CONST_ROLE);
        let mut templ = Template::new();
        templ.triple_with_relation(
            ElementType::NODE_CONST.alias("_src"),
            ElementType::EDGE_DCOMMON_CONST.alias("_edge"),
            ElementType::NODE_CONST.alias("_tgt"),
            MEMBERSHIP.alias("_attr_edge"),
            attr,
        );

        let generated = ctx.generate(&templ, &TemplateParams::new()).unwrap();

        let mut it = ctx.iterator5(
            generated["_src"],
            generated["_edge"],
            generated["_tgt"],
            generated["_attr_edge"],
            attr,
        );
        assert!(it.next());
        assert!(!it.next());
    }

    #[test]
    fn test_params_reuse_existing_elements() {
        let ctx = ctx();
        let existing = ctx.create_node(ElementType::NODE_CONST);
        let mut templ = Template::new();
        templ.triple(
            ElementType::NODE_CONST.alias("_src"),
            MEMBERSHIP,
            ElementType::NODE_CONST.alias("_tgt"),
        );
        let before = ctx.memory().store().stats();

        let generated = ctx
            .generate(&templ, &TemplateParams::new().with("_src", existing))
            .unwrap();

        assert_eq!(generated["_src"], existing);
        let after = ctx.memory().store().stats();
        assert_eq!(after.nodes, before.nodes + 1);
        assert_eq!(after.edges, before.edges + 1);
    }

    #[test]
    fn test_missing_parameter_leaves_nothing_behind() {
        // GIVEN a template whose first triple needs `_owner` before it is created
        let ctx = ctx();
        let mut templ = Template::new();
        templ
            .triple(
                ElementType::NODE_CONST.alias("_first"),
                MEMBERSHIP,
                ElementType::NODE_CONST.alias("_second"),
            )
            .triple("_owner", MEMBERSHIP, "_first")
            .triple(ElementType::NODE_CONST.alias("_owner"), MEMBERSHIP, "_second");
        let before = ctx.memory().store().stats();

        // WHEN generated without it
        let err = ctx.generate(&templ, &TemplateParams::new()).unwrap_err();

        // THEN it fails as a constraint violation and the graph is unchanged
        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
        assert!(matches!(
            err,
            SessionError::TemplateError(TemplateError::MissingBinding { .. })
        ));
        assert_eq!(ctx.memory().store().stats(), before);

        // AND supplying it makes the template generable
        let owner = ctx.create_node(ElementType::NODE_CONST);
        let generated = ctx
            .generate(&templ, &TemplateParams::new().with("_owner", owner))
            .unwrap();
        assert_eq!(generated["_owner"], owner);
    }

    #[test]
    fn test_bad_templates_are_rejected() {
        let ctx = ctx();
        let node = ctx.create_node(ElementType::NODE_CONST);

        let mut dangling = Template::new();
        dangling.triple(node, MEMBERSHIP, "_nowhere");
        let err = ctx.generate(&dangling, &TemplateParams::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let mut plain = Template::new();
        plain.triple(node, MEMBERSHIP, ElementType::NODE_CONST.alias("_x"));
        let err = ctx
            .generate(&plain, &TemplateParams::new().with("_unknown", node))
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::TemplateError(TemplateError::UnknownParam { .. })
        ));

        assert!(ctx.generate(&Template::new(), &TemplateParams::new()).is_err());
    }
}

mod searching {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_conjunctive_search() {
        // GIVEN class --> a, class --> b, a --> b
        let ctx = ctx();
        let class = ctx.create_node(ElementType::NODE_CONST_CLASS);
        let a = ctx.create_node(ElementType::NODE_CONST);
        let b = ctx.create_node(ElementType::NODE_CONST);
        let c = ctx.create_node(ElementType::NODE_CONST);
        ctx.create_edge(MEMBERSHIP, class, a);
        ctx.create_edge(MEMBERSHIP, class, b);
        ctx.create_edge(MEMBERSHIP, class, c);
        let ab = ctx.create_edge(ElementType::EDGE_DCOMMON_CONST, a, b);

        // WHEN searching for linked pairs of class members
        let mut templ = Template::new();
        templ
            .triple(class, MEMBERSHIP, ElementType::NODE_VAR.alias("_x"))
            .triple(class, MEMBERSHIP, ElementType::NODE_VAR.alias("_y"))
            .triple("_x", ElementType::EDGE_DCOMMON_VAR.alias("_rel"), "_y");
        let found = ctx.search(&templ).unwrap();

        // THEN only the pair joined by an edge matches
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["_x"], a);
        assert_eq!(found[0]["_y"], b);
        assert_eq!(found[0]["_rel"], ab);
        assert_eq!(found[0]["_missing"], Addr::INVALID);
    }

    #[test]
    fn test_search_is_stable() {
        let ctx = ctx();
        let class = ctx.create_node(ElementType::NODE_CONST_CLASS);
        for _ in 0..5 {
            let item = ctx.create_node(ElementType::NODE_CONST);
            ctx.create_edge(MEMBERSHIP, class, item);
        }
        let mut templ = Template::new();
        templ.triple(class, MEMBERSHIP, ElementType::NODE_VAR.alias("_item"));

        let first: Vec<Addr> = ctx.search(&templ).unwrap().iter().map(|b| b["_item"]).collect();
        let second: Vec<Addr> = ctx.search(&templ).unwrap().iter().map(|b| b["_item"]).collect();

        assert_eq!(first.len(), 5);
        assert_eq!(first, second);
    }

    #[test]
    fn test_search_with_params_narrows() {
        let ctx = ctx();
        let class = ctx.create_node(ElementType::NODE_CONST_CLASS);
        let a = ctx.create_node(ElementType::NODE_CONST);
        let b = ctx.create_node(ElementType::NODE_CONST);
        ctx.create_edge(MEMBERSHIP, class, a);
        ctx.create_edge(MEMBERSHIP, class, b);
        let mut templ = Template::new();
        templ.triple(
            ElementType::NODE_VAR.alias("_class"),
            MEMBERSHIP,
            ElementType::NODE_VAR.alias("_item"),
        );

        let found = ctx
            .search_with_params(&templ, &TemplateParams::new().with("_item", b))
            .unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["_class"], class);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let ctx = ctx();
        let lonely = ctx.create_node(ElementType::NODE_CONST);
        let mut templ = Template::new();
        templ.triple(lonely, MEMBERSHIP, ElementType::NODE_VAR.alias("_x"));

        let found = ctx.search(&templ).unwrap();

        assert!(found.is_empty());
        assert_eq!(found.size(), 0);
    }

    #[test]
    fn test_search_in_struct_keeps_members_only() {
        let ctx = ctx();
        let class = ctx.create_node(ElementType::NODE_CONST_CLASS);
        let inside = ctx.create_node(ElementType::NODE_CONST);
        let outside = ctx.create_node(ElementType::NODE_CONST);
        let in_edge = ctx.create_edge(MEMBERSHIP, class, inside);
        ctx.create_edge(MEMBERSHIP, class, outside);

        let structure = ctx.create_node(ElementType::NODE_CONST_STRUCT);
        for member in [class, inside, in_edge] {
            ctx.create_edge(MEMBERSHIP, structure, member);
        }

        let mut templ = Template::new();
        templ.triple(class, MEMBERSHIP, ElementType::NODE_VAR.alias("_x"));
        let found = ctx.search_in_struct(&templ, structure).unwrap();

        assert_eq!(ctx.search(&templ).unwrap().len(), 2);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["_x"], inside);
    }
}

mod structures {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_template_reproduces_triple() {
        // GIVEN struct {src, tgt, edge}
        let ctx = ctx();
        let src = ctx.create_node(ElementType::NODE_CONST);
        let tgt = ctx.create_node(ElementType::NODE_CONST);
        let edge = ctx.create_edge(ElementType::EDGE_DCOMMON_CONST, src, tgt);
        let structure = ctx.create_node(ElementType::NODE_CONST_STRUCT);
        for member in [src, tgt, edge] {
            ctx.create_edge(MEMBERSHIP, structure, member);
        }

        // WHEN it is turned into a template and searched
        let templ = ctx.build_template(structure).unwrap();
        let found = ctx.search(&templ).unwrap();

        // THEN the triple is found again
        assert_eq!(templ.len(), 1);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].triples(), &[[src, edge, tgt]]);
    }

    #[test]
    fn test_build_template_with_outside_endpoint_fails() {
        let ctx = ctx();
        let src = ctx.create_node(ElementType::NODE_CONST);
        let tgt = ctx.create_node(ElementType::NODE_CONST);
        let edge = ctx.create_edge(ElementType::EDGE_DCOMMON_CONST, src, tgt);
        let structure = ctx.create_node(ElementType::NODE_CONST_STRUCT);
        ctx.create_edge(MEMBERSHIP, structure, src);
        ctx.create_edge(MEMBERSHIP, structure, edge);

        let err = ctx.build_template(structure).unwrap_err();

        assert!(matches!(
            err,
            SessionError::TemplateError(TemplateError::MemberOutsideStructure { .. })
        ));
    }
}
