/// Integration tests for the projection engine using the default XPath and XML backends
#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::config::{Flag, MethodDescriptor, ProjectionInterface};
    use crate::dom::{Document, NodeKind};
    use crate::engine::{Projection, Projector};
    use crate::errors::{ConversionError, ProjectionError, ProjectionResult, ValidationError};
    use crate::traits::Mixin;
    use crate::types::{CustomConversion, Value, ValueType};

    const LIBRARY_XML: &str = r#"<library name="City Library">
  <book id="b1" available="true"><title>Dune</title><year>1965</year></book>
  <book id="b2" available="false"><title>Neuromancer</title><year>1984</year></book>
</library>"#;

    fn library_interface() -> ProjectionInterface {
        ProjectionInterface::new("Library")
            .with_method(
                MethodDescriptor::new("getName")
                    .reading("/library/@name")
                    .returning(ValueType::String),
            )
            .with_method(
                MethodDescriptor::new("setName")
                    .writing("/library/@name")
                    .param("name", ValueType::String)
                    .returning(ValueType::projection("Library")),
            )
            .with_method(
                MethodDescriptor::new("getBookCount")
                    .reading("count(/library/book)")
                    .returning(ValueType::Int),
            )
            .with_method(
                MethodDescriptor::new("getBooks")
                    .reading("/library/book")
                    .returning(ValueType::list(ValueType::projection("Book"))),
            )
            .with_method(
                MethodDescriptor::new("getBook")
                    .reading("/library/book[@id='{0}']")
                    .param("id", ValueType::String)
                    .returning(ValueType::projection("Book")),
            )
            .with_method(
                MethodDescriptor::new("getTitles")
                    .reading("/library/book/title")
                    .returning(ValueType::list(ValueType::String)),
            )
            .with_method(
                MethodDescriptor::new("getFeatured")
                    .reading("/library/featured")
                    .returning(ValueType::projection("Book")),
            )
            .with_method(
                MethodDescriptor::new("setFeatured")
                    .writing("/library/featured")
                    .param("book", ValueType::projection("Book")),
            )
            .with_method(
                MethodDescriptor::new("getTags")
                    .reading("/library/tags/tag")
                    .returning(ValueType::list(ValueType::String)),
            )
            .with_method(
                MethodDescriptor::new("setTags")
                    .writing("/library/tags/tag")
                    .param("tags", ValueType::list(ValueType::String)),
            )
            .with_method(
                MethodDescriptor::new("setCatalogEntry")
                    .writing("/library/catalog/entry[@id='{0}']")
                    .param("id", ValueType::String)
                    .value_param("note", ValueType::String),
            )
            .with_method(
                MethodDescriptor::new("getCatalogEntry")
                    .reading("/library/catalog/entry[@id='{0}']")
                    .param("id", ValueType::String)
                    .returning(ValueType::String),
            )
            .with_method(
                MethodDescriptor::new("setItem")
                    .writing("/library/items/{0}")
                    .param("name", ValueType::String)
                    .value_param("value", ValueType::String),
            )
            .with_method(
                MethodDescriptor::new("removeBook")
                    .deleting("/library/book[@id='{0}']")
                    .param("id", ValueType::String)
                    .returning(ValueType::projection("Library")),
            )
            .with_method(
                MethodDescriptor::new("getFirstBookNode")
                    .reading("/library/book")
                    .returning(ValueType::Node),
            )
    }

    fn book_interface() -> ProjectionInterface {
        ProjectionInterface::new("Book")
            .extending("Comparable")
            .with_method(
                MethodDescriptor::new("getId")
                    .reading("@id")
                    .returning(ValueType::String),
            )
            .with_method(
                MethodDescriptor::new("getTitle")
                    .reading("title")
                    .returning(ValueType::String),
            )
            .with_method(
                MethodDescriptor::new("setTitle")
                    .writing("title")
                    .param("title", ValueType::String)
                    .returning(ValueType::projection("Book")),
            )
            .with_method(
                MethodDescriptor::new("getYear")
                    .reading("year")
                    .returning(ValueType::Int),
            )
            .with_method(
                MethodDescriptor::new("isAvailable")
                    .reading("@available = 'true'")
                    .returning(ValueType::Boolean),
            )
            .with_method(
                MethodDescriptor::new("replace")
                    .writing(".")
                    .param("other", ValueType::projection("Book")),
            )
            .with_method(
                MethodDescriptor::new("compareTo")
                    .declared_by("Comparable")
                    .param("other", ValueType::projection("Book"))
                    .returning(ValueType::Int),
            )
    }

    fn projector() -> Projector {
        Projector::builder()
            .with_interface(library_interface())
            .with_interface(book_interface())
            .build()
    }

    fn library() -> Projection {
        projector().parse(LIBRARY_XML, "Library").unwrap()
    }

    /// Compares books by publication year
    struct YearComparator;

    impl Mixin for YearComparator {
        fn capabilities(&self) -> Vec<String> {
            vec!["Comparable".to_string(), "Serializable".to_string()]
        }

        fn invoke(&self, receiver: &Projection, method: &str, args: &[Value]) -> ProjectionResult<Value> {
            assert_eq!(method, "compareTo");
            let other = args[0].as_projection().unwrap();
            let ours = receiver.get("getYear")?.as_i64().unwrap();
            let theirs = other.get("getYear")?.as_i64().unwrap();
            Ok(Value::Int(ours.cmp(&theirs) as i32))
        }
    }

    #[test]
    fn test_title_round_trip_on_empty_document() {
        let projector = Projector::new();
        projector.register_interface(
            ProjectionInterface::new("Titled")
                .with_method(
                    MethodDescriptor::new("getTitle")
                        .reading("//title")
                        .returning(ValueType::String),
                )
                .with_method(
                    MethodDescriptor::new("setTitle")
                        .writing("/title")
                        .param("title", ValueType::String),
                ),
        );

        let empty = projector.bind_empty_document("Titled").unwrap();
        assert_eq!(empty.get("getTitle").unwrap(), Value::from(""));

        let titled = projector.bind_empty_document("Titled").unwrap();
        assert_eq!(
            titled.invoke("setTitle", &[Value::from("Hello")]).unwrap(),
            Value::Unit
        );
        assert_eq!(titled.get("getTitle").unwrap(), Value::from("Hello"));
        assert_eq!(titled.as_string(), r#"<?xml version="1.0" encoding="UTF-8"?><title>Hello</title>"#);
    }

    #[test]
    fn test_missing_nodes_read_as_zero_values() {
        struct TestCase {
            returns: ValueType,
            expected: Value,
        }

        let test_cases = vec![
            TestCase { returns: ValueType::String, expected: Value::from("") },
            TestCase { returns: ValueType::Int, expected: Value::Int(0) },
            TestCase { returns: ValueType::Long, expected: Value::Long(0) },
            TestCase { returns: ValueType::Double, expected: Value::Double(0.0) },
            TestCase { returns: ValueType::Boolean, expected: Value::Boolean(false) },
            TestCase { returns: ValueType::projection("Missing"), expected: Value::Null },
            TestCase { returns: ValueType::Node, expected: Value::Null },
            TestCase {
                returns: ValueType::list(ValueType::String),
                expected: Value::List(vec![]),
            },
        ];

        for test_case in test_cases {
            let projector = Projector::new();
            projector.register_interface(ProjectionInterface::new("Missing").with_method(
                MethodDescriptor::new("get")
                    .reading("/root/missing")
                    .returning(test_case.returns.clone()),
            ));
            let projection = projector.parse("<root/>", "Missing").unwrap();
            assert_eq!(
                projection.get("get").unwrap(),
                test_case.expected,
                "Failed for return type {}",
                test_case.returns
            );
        }
    }

    #[test]
    fn test_write_then_read_round_trip_for_every_scalar_type() {
        let cases: Vec<(&str, ValueType, Value)> = vec![
            ("string", ValueType::String, Value::from("some text")),
            ("boolean", ValueType::Boolean, Value::Boolean(true)),
            ("char", ValueType::Char, Value::Char('x')),
            ("byte", ValueType::Byte, Value::Byte(-7)),
            ("short", ValueType::Short, Value::Short(1234)),
            ("int", ValueType::Int, Value::Int(-42)),
            ("long", ValueType::Long, Value::Long(1_300_000_000_000)),
            ("float", ValueType::Float, Value::Float(2.5)),
            ("double", ValueType::Double, Value::Double(0.1)),
            (
                "color",
                ValueType::enumeration("Color", &["RED", "GREEN"]),
                Value::Enum {
                    type_name: "Color".into(),
                    variant: "GREEN".into(),
                },
            ),
        ];

        let mut interface = ProjectionInterface::new("Record");
        for (name, ty, _) in &cases {
            interface = interface
                .with_method(
                    MethodDescriptor::new(&format!("set_{}", name))
                        .writing(&format!("/record/{}", name))
                        .param("value", ty.clone()),
                )
                .with_method(
                    MethodDescriptor::new(&format!("get_{}", name))
                        .reading(&format!("/record/{}", name))
                        .returning(ty.clone()),
                );
        }
        let projector = Projector::new();
        projector.register_interface(interface);
        let record = projector.bind_empty_document("Record").unwrap();

        for (name, _, value) in &cases {
            record
                .invoke(&format!("set_{}", name), std::slice::from_ref(value))
                .unwrap();
            assert_eq!(
                record.get(&format!("get_{}", name)).unwrap(),
                *value,
                "Failed round trip for {}",
                name
            );
        }

        // the intermediate element is reused, not duplicated
        let tree = record.owner_document().read();
        assert_eq!(tree.element_children(tree.root()).count(), 1);
    }

    #[test]
    fn test_delete_removes_all_matches_and_is_idempotent() {
        let projector = Projector::new();
        projector.register_interface(
            ProjectionInterface::new("Pruner")
                .with_method(MethodDescriptor::new("removeB").deleting("/a/b"))
                .with_method(
                    MethodDescriptor::new("getB")
                        .reading("/a/b")
                        .returning(ValueType::String),
                )
                .with_method(
                    MethodDescriptor::new("getFirstB")
                        .reading("/a/b")
                        .returning(ValueType::Node),
                ),
        );
        let pruner = projector
            .parse("<a><b>one</b><c/><b>two</b></a>", "Pruner")
            .unwrap();

        assert_eq!(pruner.invoke("removeB", &[]).unwrap(), Value::Unit);
        assert_eq!(pruner.get("getB").unwrap(), Value::from(""));
        assert_eq!(pruner.get("getFirstB").unwrap(), Value::Null);
        let after_first = pruner.as_string();

        pruner.invoke("removeB", &[]).unwrap();
        assert_eq!(pruner.as_string(), after_first);
        assert!(after_first.ends_with("<a><c/></a>"));
    }

    #[test]
    fn test_structural_equality_across_documents() {
        let projector = projector();
        let first = projector.parse(LIBRARY_XML, "Library").unwrap();
        let second = projector.parse(LIBRARY_XML, "Library").unwrap();

        assert!(!first.owner_document().ptr_eq(second.owner_document()));
        assert_eq!(first, second);
        assert_eq!(first.structural_hash(), second.structural_hash());
        assert_eq!(
            first.invoke("equals", &[Value::Projection(second.clone())]).unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(first.get("hashCode").unwrap(), second.get("hashCode").unwrap());

        let as_book = projector.bind_document(second.owner_document(), "Book").unwrap();
        assert_ne!(first, as_book);
        assert_eq!(
            first.invoke("equals", &[Value::from("a string")]).unwrap(),
            Value::Boolean(false)
        );

        second.invoke("setName", &[Value::from("Other")]).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_sub_projections_share_the_document() {
        let library = library();
        let book = library.invoke("getBook", &[Value::from("b2")]).unwrap();
        let book = book.as_projection().unwrap();

        assert_eq!(book.get("getTitle").unwrap(), Value::from("Neuromancer"));
        assert_eq!(book.get("getYear").unwrap(), Value::Int(1984));
        assert_eq!(book.get("isAvailable").unwrap(), Value::Boolean(false));
        assert!(book.owner_document().ptr_eq(library.owner_document()));

        let returned = book.invoke("setTitle", &[Value::from("Count Zero")]).unwrap();
        assert_eq!(returned.as_projection(), Some(book));
        assert_eq!(
            library.get("getTitles").unwrap(),
            Value::List(vec![Value::from("Dune"), Value::from("Count Zero")])
        );

        assert_eq!(
            library.invoke("getBook", &[Value::from("nope")]).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_list_of_sub_projections() {
        let library = library();
        let books = library.get("getBooks").unwrap();
        let ids: Vec<Value> = books
            .as_list()
            .unwrap()
            .iter()
            .map(|book| book.as_projection().unwrap().get("getId").unwrap())
            .collect();
        assert_eq!(ids, vec![Value::from("b1"), Value::from("b2")]);
        assert_eq!(library.get("getBookCount").unwrap(), Value::Int(2));
    }

    #[test]
    fn test_writes_return_the_projection_when_declared() {
        let library = library();
        let returned = library.invoke("setName", &[Value::from("Town Library")]).unwrap();
        assert_eq!(returned, Value::Projection(library.clone()));
        assert_eq!(library.get("getName").unwrap(), Value::from("Town Library"));

        let after_delete = library.invoke("removeBook", &[Value::from("b1")]).unwrap();
        assert_eq!(after_delete, Value::Projection(library.clone()));
        assert_eq!(library.get("getBookCount").unwrap(), Value::Int(1));
    }

    #[test]
    fn test_write_sub_projection_copies_and_renames() {
        let library = library();
        let book = library.invoke("getBook", &[Value::from("b1")]).unwrap();

        library.invoke("setFeatured", &[book.clone()]).unwrap();
        let featured = library.get("getFeatured").unwrap();
        let featured = featured.as_projection().unwrap();
        assert_eq!(featured.dom_node().name().as_deref(), Some("featured"));
        assert_eq!(featured.get("getTitle").unwrap(), Value::from("Dune"));
        assert_eq!(featured.get("getId").unwrap(), Value::from("b1"));

        // the copy is independent of its source
        book.as_projection()
            .unwrap()
            .invoke("setTitle", &[Value::from("Dune Messiah")])
            .unwrap();
        assert_eq!(featured.get("getTitle").unwrap(), Value::from("Dune"));

        // writing again replaces, writing null removes
        let other = library.invoke("getBook", &[Value::from("b2")]).unwrap();
        library.invoke("setFeatured", &[other]).unwrap();
        let featured = library.get("getFeatured").unwrap();
        assert_eq!(
            featured.as_projection().unwrap().get("getTitle").unwrap(),
            Value::from("Neuromancer")
        );
        library.invoke("setFeatured", &[Value::Null]).unwrap();
        assert_eq!(library.get("getFeatured").unwrap(), Value::Null);
    }

    #[test]
    fn test_write_sub_projection_from_another_document() {
        let projector = projector();
        let library = projector.parse(LIBRARY_XML, "Library").unwrap();
        let loose = projector.bind_empty_element("book", "Book").unwrap();
        loose.invoke("setTitle", &[Value::from("Solaris")]).unwrap();

        library.invoke("setFeatured", &[Value::Projection(loose)]).unwrap();
        let featured = library.get("getFeatured").unwrap();
        assert_eq!(
            featured.as_projection().unwrap().get("getTitle").unwrap(),
            Value::from("Solaris")
        );
    }

    #[test]
    fn test_write_list_replaces_all_matches() {
        let library = library();
        let tags = |items: &[&str]| Value::List(items.iter().map(|t| Value::from(*t)).collect());

        library.invoke("setTags", &[tags(&["scifi", "classic"])]).unwrap();
        assert_eq!(library.get("getTags").unwrap(), tags(&["scifi", "classic"]));

        library.invoke("setTags", &[tags(&["space"])]).unwrap();
        assert_eq!(library.get("getTags").unwrap(), tags(&["space"]));

        library.invoke("setTags", &[Value::Null]).unwrap();
        assert_eq!(library.get("getTags").unwrap(), tags(&[]));
    }

    #[test]
    fn test_created_target_satisfies_predicate() {
        let library = library();
        library
            .invoke("setCatalogEntry", &[Value::from("c1"), Value::from("first")])
            .unwrap();
        library
            .invoke("setCatalogEntry", &[Value::from("c2"), Value::from("second")])
            .unwrap();
        library
            .invoke("setCatalogEntry", &[Value::from("c1"), Value::from("updated")])
            .unwrap();

        assert_eq!(
            library.invoke("getCatalogEntry", &[Value::from("c1")]).unwrap(),
            Value::from("updated")
        );
        assert_eq!(
            library.invoke("getCatalogEntry", &[Value::from("c2")]).unwrap(),
            Value::from("second")
        );
        assert!(library
            .as_string()
            .contains(r#"<catalog><entry id="c1">updated</entry><entry id="c2">second</entry></catalog>"#));
    }

    #[test]
    fn test_substituted_selector_must_stay_writable() {
        let library = library();
        library
            .invoke("setItem", &[Value::from("color"), Value::from("blue")])
            .unwrap();
        assert!(library.as_string().contains("<items><color>blue</color></items>"));

        let result = library.invoke("setItem", &[Value::from("a//b"), Value::from("x")]);
        assert!(matches!(
            result,
            Err(ProjectionError::IllegalWriteSelector { ref selector }) if selector == "/library/items/a//b"
        ));
    }

    #[test]
    fn test_replace_document_element_through_self() {
        let projector = projector();
        let document_book = projector.parse("<book><title>Old</title></book>", "Book").unwrap();
        let source = projector
            .parse("<book><title>New</title><year>2001</year></book>", "Book")
            .unwrap();

        document_book
            .invoke("replace", &[Value::Projection(source.clone())])
            .unwrap();
        // "title" is relative to the document node, which only has a book child
        assert_eq!(document_book.get("getTitle").unwrap(), Value::from(""));
        let element = projector
            .bind(&document_book.base_element().unwrap(), "Book")
            .unwrap();
        assert_eq!(element.get("getTitle").unwrap(), Value::from("New"));
        assert_eq!(element.get("getYear").unwrap(), Value::Int(2001));

        let result = element.invoke("replace", &[Value::Projection(source)]);
        assert!(matches!(result, Err(ProjectionError::IllegalArgument(_))));
    }

    #[test]
    fn test_failed_path_creation_leaves_the_tree_untouched() {
        let projector = Projector::new();
        projector.register_interface(
            ProjectionInterface::new("Branch")
                .with_method(
                    MethodDescriptor::new("setBesideRoot")
                        .writing("x/y/../../../z")
                        .param("value", ValueType::String),
                )
                .with_method(
                    MethodDescriptor::new("setAboveDocument")
                        .writing("x/../../../z")
                        .param("value", ValueType::String),
                ),
        );
        let document = projector.parse("<root/>", "Branch").unwrap();
        let root = projector
            .bind(&document.base_element().unwrap(), "Branch")
            .unwrap();

        assert!(matches!(
            root.invoke("setBesideRoot", &[Value::from("v")]),
            Err(ProjectionError::IllegalArgument(ref message)) if message.contains("second document element")
        ));
        assert!(matches!(
            root.invoke("setAboveDocument", &[Value::from("v")]),
            Err(ProjectionError::IllegalArgument(ref message)) if message.contains("climbs above")
        ));
        assert_eq!(root.as_string(), "<root/>");
    }

    #[test]
    fn test_text_needs_a_node_to_hold_it() {
        let projector = Projector::new();
        projector.register_interface(
            ProjectionInterface::new("Note")
                .with_method(
                    MethodDescriptor::new("setSelf")
                        .writing(".")
                        .param("text", ValueType::String),
                )
                .with_method(
                    MethodDescriptor::new("getSelf")
                        .reading(".")
                        .returning(ValueType::String),
                ),
        );

        let empty = projector.bind_empty_document("Note").unwrap();
        assert!(matches!(
            empty.invoke("setSelf", &[Value::from("hello")]),
            Err(ProjectionError::IllegalArgument(_))
        ));

        let note = projector.parse("<note>old</note>", "Note").unwrap();
        note.invoke("setSelf", &[Value::from("hello")]).unwrap();
        assert_eq!(note.get("getSelf").unwrap(), Value::from("hello"));
    }

    #[test]
    fn test_repeated_writes_reuse_arena_slots() {
        let projector = Projector::new();
        projector.register_interface(
            ProjectionInterface::new("Note")
                .with_method(
                    MethodDescriptor::new("setText")
                        .writing("/note/text")
                        .param("text", ValueType::String),
                )
                .with_method(MethodDescriptor::new("removeText").deleting("/note/text"))
                .with_method(
                    MethodDescriptor::new("getText")
                        .reading("/note/text")
                        .returning(ValueType::String),
                ),
        );
        let note = projector.bind_empty_document("Note").unwrap();

        for i in 0..1000 {
            note.invoke("setText", &[Value::String(format!("v{}", i))]).unwrap();
        }
        for i in 0..100 {
            note.invoke("removeText", &[]).unwrap();
            note.invoke("setText", &[Value::String(format!("w{}", i))]).unwrap();
        }

        assert_eq!(note.get("getText").unwrap(), Value::from("w99"));
        let tree = note.owner_document().read();
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.slot_count(), 4);
    }

    #[test]
    fn test_arguments_cannot_widen_keyed_selectors() {
        let library = library();

        let result = library.invoke("removeBook", &[Value::from("b1' or @id='b2")]);
        assert!(matches!(result, Err(ProjectionError::IllegalWriteSelector { .. })));
        assert_eq!(library.get("getBookCount").unwrap(), Value::Int(2));

        let result = library.invoke(
            "setCatalogEntry",
            &[Value::from("c1' or @id='c2"), Value::from("note")],
        );
        assert!(matches!(result, Err(ProjectionError::IllegalWriteSelector { .. })));
        assert!(!library.as_string().contains("<catalog>"));
    }

    #[test]
    fn test_cross_document_comparisons_under_concurrent_writes() {
        let projector = projector();
        let first = projector.parse(LIBRARY_XML, "Library").unwrap();
        let second = projector.parse(LIBRARY_XML, "Library").unwrap();

        std::thread::scope(|scope| {
            for (a, b) in [(first.clone(), second.clone()), (second.clone(), first.clone())] {
                scope.spawn(move || {
                    for _ in 0..200 {
                        let _ = a == b;
                    }
                });
            }
            for library in [first.clone(), second.clone()] {
                scope.spawn(move || {
                    for i in 0..200 {
                        library
                            .invoke("setName", &[Value::String(format!("n{}", i % 2))])
                            .unwrap();
                    }
                });
            }
        });

        assert_eq!(first, second);
    }

    #[test]
    fn test_mixin_delegation() {
        let projector = projector();
        let library = projector.parse(LIBRARY_XML, "Library").unwrap();
        let dune = library.invoke("getBook", &[Value::from("b1")]).unwrap();
        let neuromancer = library.invoke("getBook", &[Value::from("b2")]).unwrap();
        let dune = dune.as_projection().unwrap();

        let missing = dune.invoke("compareTo", &[neuromancer.clone()]);
        assert!(matches!(
            missing,
            Err(ProjectionError::MixinMissing { ref capability, .. }) if capability == "Comparable"
        ));

        projector
            .mixins()
            .add_projection_mixin("Book", Arc::new(YearComparator))
            .unwrap();
        assert!(projector
            .mixins()
            .get_projection_mixin("Book", "Comparable")
            .is_some());
        assert!(projector
            .mixins()
            .get_projection_mixin("Book", "Serializable")
            .is_none());
        assert_eq!(
            dune.invoke("compareTo", &[neuromancer.clone()]).unwrap(),
            Value::Int(-1)
        );

        assert!(projector
            .mixins()
            .remove_projection_mixin("Book", "Comparable")
            .is_some());
        assert!(dune.invoke("compareTo", &[neuromancer]).is_err());
    }

    #[test]
    fn test_mixin_without_common_capability_is_rejected() {
        let projector = projector();
        let result = projector
            .mixins()
            .add_projection_mixin("Library", Arc::new(YearComparator));
        assert!(matches!(result, Err(ProjectionError::IllegalArgument(_))));
    }

    #[test]
    fn test_invocation_errors() {
        let library = library();

        assert!(matches!(
            library.get("getNothing"),
            Err(ProjectionError::UnknownMethod { ref method, .. }) if method == "getNothing"
        ));
        assert!(matches!(
            library.get("getBook"),
            Err(ProjectionError::IllegalArgument(_))
        ));
        assert!(matches!(
            library.invoke("setName", &[Value::List(vec![])]),
            Err(ProjectionError::Conversion(ConversionError::UnsupportedValue { .. }))
        ));
    }

    #[test]
    fn test_unparsable_text_is_a_conversion_error() {
        let library = projector()
            .parse(
                r#"<library><book id="b9"><year>next spring</year></book></library>"#,
                "Library",
            )
            .unwrap();
        let book = library.invoke("getBook", &[Value::from("b9")]).unwrap();
        let book = book.as_projection().unwrap();

        assert!(matches!(
            book.get("getYear"),
            Err(ProjectionError::Conversion(ConversionError::Unparsable { ref text, .. }))
                if text == "next spring"
        ));
        assert_eq!(library.get("getBookCount").unwrap(), Value::Int(1));
    }

    #[test]
    fn test_invalid_interfaces_are_rejected_at_bind_time() {
        let projector = Projector::new();
        projector.register_interface(
            ProjectionInterface::new("Broken").with_method(
                MethodDescriptor::new("setTitle")
                    .writing("//title")
                    .param("title", ValueType::String),
            ),
        );

        assert!(matches!(
            projector.bind_empty_document("Broken"),
            Err(ProjectionError::InvalidInterface { ref interface, .. }) if interface == "Broken"
        ));
        assert!(matches!(
            projector.bind_empty_document("Unregistered"),
            Err(ProjectionError::InvalidInterface { .. })
        ));

        // replacing the descriptor drops the cached verdict
        projector.register_interface(
            ProjectionInterface::new("Broken").with_method(
                MethodDescriptor::new("setTitle")
                    .writing("/title")
                    .param("title", ValueType::String),
            ),
        );
        assert!(projector.bind_empty_document("Broken").is_ok());
    }

    /// Whole-cent prices stored as decimal text
    struct Cents;

    impl CustomConversion for Cents {
        fn from_text(&self, text: &str) -> Result<serde_json::Value, ConversionError> {
            let amount: f64 = text.parse().map_err(|_| ConversionError::Custom {
                type_name: "Money".into(),
                reason: format!("'{}' is not an amount", text),
            })?;
            Ok(serde_json::json!((amount * 100.0).round() as i64))
        }

        fn to_text(&self, value: &serde_json::Value) -> Result<String, ConversionError> {
            let cents = value.as_i64().unwrap_or_default();
            Ok(format!("{}.{:02}", cents / 100, cents % 100))
        }
    }

    #[test]
    fn test_custom_types_need_a_registered_conversion() {
        let priced = || {
            ProjectionInterface::new("Priced")
                .with_method(
                    MethodDescriptor::new("getPrice")
                        .reading("/item/price")
                        .returning(ValueType::Custom("Money".into())),
                )
                .with_method(
                    MethodDescriptor::new("setPrice")
                        .writing("/item/price")
                        .param("price", ValueType::Custom("Money".into())),
                )
        };

        let bare = Projector::builder().with_interface(priced()).build();
        let Err(ProjectionError::InvalidInterface { errors, .. }) = bare.bind_empty_document("Priced") else {
            panic!("expected the unregistered custom type to be rejected");
        };
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| matches!(e, ValidationError::UnconvertibleType { ty, .. } if ty == "custom<Money>")));

        let projector = Projector::builder()
            .with_interface(priced())
            .register_conversion("Money", Arc::new(Cents))
            .build();
        let item = projector.parse("<item><price>4.50</price></item>", "Priced").unwrap();
        let price = item.get("getPrice").unwrap();
        assert_eq!(
            price,
            Value::Custom {
                type_name: "Money".into(),
                value: serde_json::json!(450)
            }
        );
        item.invoke(
            "setPrice",
            &[Value::Custom {
                type_name: "Money".into(),
                value: serde_json::json!(1205),
            }],
        )
        .unwrap();
        assert!(item.as_string().ends_with("<item><price>12.05</price></item>"));
    }

    #[test]
    fn test_only_documents_and_elements_can_be_bound() {
        let projector = projector();
        let library = projector.parse(LIBRARY_XML, "Library").unwrap();
        let name_attribute = library
            .base_element()
            .unwrap()
            .set_attribute("name", "x")
            .unwrap();
        assert!(matches!(
            projector.bind(&name_attribute, "Library"),
            Err(ProjectionError::IllegalArgument(_))
        ));
    }

    #[test]
    fn test_to_string_policy() {
        let library = library();
        assert_eq!(library.to_string(), "Projection [Library] to document");
        let book = library.invoke("getBook", &[Value::from("b1")]).unwrap();
        assert_eq!(
            book.as_projection().unwrap().to_string(),
            "Projection [Book] to element 'book'"
        );
        assert_eq!(
            library.get("toString").unwrap(),
            Value::from("Projection [Library] to document")
        );

        let rendering = Projector::builder()
            .with_flag(Flag::ToStringRendersXml)
            .with_interface(book_interface())
            .build();
        let book = rendering
            .parse("<book><title>Dune</title></book>", "Book")
            .unwrap();
        assert_eq!(
            book.to_string(),
            r#"<?xml version="1.0" encoding="UTF-8"?><book><title>Dune</title></book>"#
        );
    }

    #[test]
    fn test_dom_access_operations() {
        let library = library();

        let node = library.get("getDOMNode").unwrap();
        assert_eq!(node.as_node().unwrap().kind(), Some(NodeKind::Document));
        let owner = library.get("getDOMOwnerDocument").unwrap();
        assert_eq!(owner.as_node(), Some(&library.owner_document().root()));
        let base = library.get("getDOMBaseElement").unwrap();
        assert_eq!(base.as_node().unwrap().name().as_deref(), Some("library"));
        assert_eq!(
            library.get("getProjectionInterface").unwrap(),
            Value::from("Library")
        );

        let first = library.get("getFirstBookNode").unwrap();
        assert_eq!(first.as_node().unwrap().attribute("id").as_deref(), Some("b1"));

        let book = library.invoke("getBook", &[Value::from("b2")]).unwrap();
        let book = book.as_projection().unwrap();
        assert_eq!(book.base_element().as_ref(), Some(book.dom_node()));
        assert!(book.as_string().starts_with(r#"<book id="b2" available="false">"#));
    }

    #[test]
    fn test_projector_as_string_rejects_non_projections() {
        let projector = projector();
        let library = projector.parse(LIBRARY_XML, "Library").unwrap();
        assert!(projector.as_string(&Value::Projection(library)).is_ok());
        assert!(matches!(
            projector.as_string(&Value::from("text")),
            Err(ProjectionError::IllegalArgument(_))
        ));
    }

    /// Increments a counter through the projection's own read and write methods
    struct Increment;

    impl Mixin for Increment {
        fn capabilities(&self) -> Vec<String> {
            vec!["Counting".to_string()]
        }

        fn invoke(&self, receiver: &Projection, _method: &str, _args: &[Value]) -> ProjectionResult<Value> {
            let count = receiver.get("getCount")?.as_i64().unwrap();
            receiver.invoke("setCount", &[Value::Long(count + 1)])?;
            Ok(Value::Unit)
        }
    }

    #[test]
    fn test_synchronized_invocations_are_atomic_and_reentrant() {
        let projector = Projector::builder()
            .with_flag(Flag::SynchronizeOnDocuments)
            .with_interface(
                ProjectionInterface::new("Counter")
                    .extending("Counting")
                    .with_method(
                        MethodDescriptor::new("getCount")
                            .reading("/counter/value")
                            .returning(ValueType::Long),
                    )
                    .with_method(
                        MethodDescriptor::new("setCount")
                            .writing("/counter/value")
                            .param("count", ValueType::Long),
                    )
                    .with_method(MethodDescriptor::new("increment").declared_by("Counting")),
            )
            .build();
        projector
            .mixins()
            .add_projection_mixin("Counter", Arc::new(Increment))
            .unwrap();

        let document = Document::new();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                let counter = projector.bind_document(&document, "Counter").unwrap();
                scope.spawn(move || {
                    for _ in 0..25 {
                        counter.invoke("increment", &[]).unwrap();
                    }
                });
            }
        });

        let counter = projector.bind_document(&document, "Counter").unwrap();
        assert_eq!(counter.get("getCount").unwrap(), Value::Long(100));
    }

    #[test]
    fn test_file_io_round_trip() {
        let projector = projector();
        let library = projector.parse(LIBRARY_XML, "Library").unwrap();
        library.invoke("setName", &[Value::from("Saved")]).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.xml");
        projector.io().file(&path).write(&library).unwrap();

        let reloaded = projector.io().file(&path).read("Library").unwrap();
        assert_eq!(reloaded.get("getName").unwrap(), Value::from("Saved"));
        assert_eq!(reloaded, library);

        let missing = projector.io().file(dir.path().join("missing.xml")).read("Library");
        assert!(matches!(missing, Err(ProjectionError::Io(_))));
    }

    #[test]
    fn test_read_from_document_origin() {
        let projector = Projector::new();
        projector.register_interface(
            ProjectionInterface::new("Catalogue")
                .with_document_origin("demos/{0}.xml")
                .with_method(
                    MethodDescriptor::new("getName")
                        .reading("/library/@name")
                        .returning(ValueType::String),
                ),
        );
        let catalogue = projector
            .io()
            .read_origin("Catalogue", &[Value::from("library")])
            .unwrap();
        assert_eq!(catalogue.get("getName").unwrap(), Value::from("City Library"));

        assert!(matches!(
            projector.io().read_origin("Catalogue", &[Value::from("missing")]),
            Err(ProjectionError::Io(_))
        ));
    }
}
