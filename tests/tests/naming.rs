//! Identifier resolution and keynodes.

use pretty_assertions::assert_eq;
use semnet_tests::prelude::*;
use std::thread;

mod resolve {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_identifier_does_not_mutate() {
        let ctx = manual_memory().context("naming");
        let before = ctx.memory().store().stats();

        let addr = ctx.resolve_identifier("does_not_exist", None);

        assert_eq!(addr, Addr::INVALID);
        assert_eq!(ctx.memory().store().stats(), before);
    }

    #[test]
    fn test_create_is_idempotent() {
        let ctx = manual_memory().context("naming");

        let first = ctx.resolve_identifier("concept_book", Some(ElementType::NODE_CONST_CLASS));
        let stats = ctx.memory().store().stats();
        let second = ctx.resolve_identifier("concept_book", Some(ElementType::NODE_CONST_CLASS));

        assert!(first.is_valid());
        assert_eq!(first, second);
        assert_eq!(ctx.memory().store().stats(), stats);
        assert_eq!(ctx.element_type(first), ElementType::NODE_CONST_CLASS);
        assert_eq!(ctx.get_identifier(first).as_deref(), Some("concept_book"));
    }

    #[test]
    fn test_concurrent_resolve_creates_one_element() {
        let memory = manual_memory();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let ctx = memory.context(format!("worker-{i}"));
                thread::spawn(move || {
                    ctx.resolve_identifier("shared_concept", Some(ElementType::NODE_CONST))
                })
            })
            .collect();

        let addrs: Vec<Addr> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(addrs[0].is_valid());
        assert!(addrs.iter().all(|addr| *addr == addrs[0]));
        assert_eq!(
            memory.context("check").find_links_by_content("shared_concept").len(),
            1
        );
    }

    #[test]
    fn test_non_node_create_type_yields_invalid() {
        let ctx = manual_memory().context("naming");

        let addr = ctx.resolve_identifier("bad", Some(ElementType::EDGE_ACCESS_CONST_POS_PERM));

        assert_eq!(addr, Addr::INVALID);
        assert_eq!(ctx.resolve_identifier("bad", None), Addr::INVALID);
    }
}

mod identifiers {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_set_and_get() {
        let ctx = manual_memory().context("naming");
        let node = ctx.create_node(ElementType::NODE_CONST);

        assert_eq!(ctx.get_identifier(node), None);
        assert!(ctx.set_identifier("my_node", Addr::INVALID).is_err());
        ctx.set_identifier("my_node", node).unwrap();

        assert_eq!(ctx.get_identifier(node).as_deref(), Some("my_node"));
        assert_eq!(ctx.resolve_identifier("my_node", None), node);
    }

    #[test]
    fn test_rename_releases_old_identifier() {
        let ctx = manual_memory().context("naming");
        let node = ctx.create_node(ElementType::NODE_CONST);
        ctx.set_identifier("first", node).unwrap();

        ctx.set_identifier("second", node).unwrap();

        assert_eq!(ctx.resolve_identifier("first", None), Addr::INVALID);
        assert_eq!(ctx.resolve_identifier("second", None), node);
        assert!(ctx.find_links_by_content("first").is_empty());
    }

    #[test]
    fn test_conflicting_identifier_is_rejected() {
        let ctx = manual_memory().context("naming");
        let a = ctx.create_node(ElementType::NODE_CONST);
        let b = ctx.create_node(ElementType::NODE_CONST);
        ctx.set_identifier("unique", a).unwrap();

        let err = ctx.set_identifier("unique", b).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
        assert_eq!(ctx.get_identifier(b), None);
        assert_eq!(ctx.resolve_identifier("unique", None), a);
    }

    #[test]
    fn test_identifier_layout() {
        // GIVEN a named node
        let memory = manual_memory();
        let ctx = memory.context("naming");
        let node = ctx.create_node(ElementType::NODE_CONST);
        ctx.set_identifier("laid_out", node).unwrap();
        let nrel = memory.keynodes().nrel_system_identifier();

        // WHEN following node --dcommon--> link, qualified by the naming relation
        let mut it = ctx.iterator5(
            node,
            ElementType::EDGE_DCOMMON_CONST,
            ElementType::LINK,
            ElementType::EDGE_ACCESS_CONST_POS_PERM,
            nrel,
        );

        // THEN exactly one link holds the identifier
        assert!(it.next());
        let link = it.get(2);
        assert_eq!(ctx.link_content(link).unwrap().as_str().unwrap(), "laid_out");
        assert!(!it.next());
    }

    #[test]
    fn test_erasing_element_frees_identifier() {
        let ctx = manual_memory().context("naming");
        let node = ctx.resolve_identifier("temporary", Some(ElementType::NODE_CONST));

        assert!(ctx.erase_element(node));

        assert_eq!(ctx.resolve_identifier("temporary", None), Addr::INVALID);
        assert!(ctx.find_links_by_content("temporary").is_empty());
        let replacement = ctx.resolve_identifier("temporary", Some(ElementType::NODE_CONST));
        assert!(replacement.is_valid());
        assert_ne!(replacement, node);
    }
}

mod keynodes {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_keynodes_are_named() {
        let memory = manual_memory();
        let ctx = memory.context("keynodes");

        for name in ["sc_result", "question", "nrel_inclusion", "nrel_system_identifier"] {
            let addr = memory.keynodes()[name];
            assert!(addr.is_valid(), "{name} missing");
            assert_eq!(ctx.resolve_identifier(name, None), addr);
        }
        assert_eq!(
            ctx.element_type(memory.keynodes()["nrel_inclusion"]),
            ElementType::NODE_CONST_NOROLE
        );
    }

    #[test]
    fn test_configured_keynodes() {
        let memory = Memory::new(
            MemoryConfig::new()
                .with_dispatch(DispatchMode::Manual)
                .with_keynode("rrel_key"),
        )
        .unwrap();

        assert_eq!(
            memory.context("k").element_type(memory.keynodes()["rrel_key"]),
            ElementType::NODE_CONST_ROLE
        );
    }

    #[test]
    fn test_config_from_json() {
        let config = MemoryConfig::from_json(
            r#"{"dispatch": "manual", "keynodes": ["only_this"]}"#,
        )
        .unwrap();
        let memory = Memory::new(config).unwrap();

        assert!(memory.keynodes()["only_this"].is_valid());
        assert!(memory.keynodes().nrel_system_identifier().is_valid());
        assert_eq!(memory.keynodes()["sc_result"], Addr::INVALID);
    }
}
