// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//! Tests for ClassResolver.

use super::*;
use crate::config::{Language, FIRST_BUILTIN_CLASS_ID};
use crate::types::TypeShape;

#[derive(Debug)]
struct Named(&'static str);

impl Serializer for Named {
    fn name(&self) -> &str {
        self.0
    }
}

fn resolver() -> ClassResolver {
    ClassResolver::new(ResolverConfig::default(), Arc::new(MetaStringResolver::new()))
        .expect("resolver")
}

fn strict_resolver() -> ClassResolver {
    let config = ResolverConfig {
        require_class_registration: true,
        ..ResolverConfig::default()
    };
    ClassResolver::new(config, Arc::new(MetaStringResolver::new())).expect("resolver")
}

fn class(name: &str) -> TypeRef {
    ClassDescriptor::infer(name).into_ref()
}

#[test]
fn placeholders_and_builtins_are_preinstalled() {
    let resolver = resolver();
    for stub in [ClassId::LAMBDA_STUB, ClassId::PROXY_STUB, ClassId::REPLACE_STUB] {
        let placeholder = resolver.class_info_by_id(stub).expect("placeholder");
        assert!(placeholder.class().is_none());
        assert_eq!(placeholder.class_id(), stub);
    }

    let int = resolver
        .class_info_by_id(ClassId::from_raw(FIRST_BUILTIN_CLASS_ID + 5))
        .expect("int");
    assert_eq!(int.key().map(|key| key.to_string()).as_deref(), Some("int"));

    let string = resolver
        .get_or_create_class_info(&class("java.lang.String"))
        .expect("string");
    assert_eq!(string.class_id().get(), 13);
    assert!(!string.uses_name_path());
}

#[test]
fn unregistered_class_takes_the_name_path_once() {
    let resolver = resolver();
    let widget = class("com.acme.Widget");
    let first = resolver.get_or_create_class_info(&widget).expect("first");
    let second = resolver.get_or_create_class_info(&widget).expect("second");
    assert!(Arc::ptr_eq(&first, &second));
    assert!(first.uses_name_path());
    assert_eq!(first.class_id(), ClassId::NONE);

    let by_names = resolver
        .class_info_by_names(
            first.package_name_bytes().expect("pkg"),
            first.class_name_bytes().expect("name"),
        )
        .expect("indexed");
    assert!(Arc::ptr_eq(&first, &by_names));
}

#[test]
fn registration_switches_to_the_numeric_path() {
    let resolver = resolver();
    let widget = class("com.acme.Widget");
    let unregistered = resolver.get_or_create_class_info(&widget).expect("info");
    unregistered.set_serializer(Arc::new(Named("generic")));

    let id = resolver.register(&widget).expect("register");
    let registered = resolver.get_or_create_class_info(&widget).expect("info");
    assert_eq!(registered.class_id(), id);
    assert!(!registered.uses_name_path());
    assert_eq!(registered.serializer().expect("carried over").name(), "generic");

    let by_id = resolver.class_info_by_id(id).expect("by id");
    assert!(Arc::ptr_eq(&by_id, &registered));
    assert!(resolver
        .class_info_by_names(
            unregistered.package_name_bytes().expect("pkg"),
            unregistered.class_name_bytes().expect("name"),
        )
        .is_none());
}

#[test]
fn register_with_id_and_conflicts() {
    let resolver = resolver();
    let widget = class("com.acme.Widget");
    let gadget = class("com.acme.Gadget");
    assert_eq!(resolver.register_with_id(&widget, 500).expect("widget").get(), 500);
    assert!(matches!(
        resolver.register_with_id(&gadget, 500),
        Err(Error::RegistrationConflict { .. })
    ));
    assert!(matches!(
        resolver.register_with_id(&gadget, 2),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        resolver.register_with_id(&gadget, i16::MAX),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn dynamic_classes_cannot_be_registered_but_still_resolve() {
    let resolver = strict_resolver();
    let lambda = class("com.acme.App$$Lambda$42/0x0000000800c0a000");
    assert!(lambda.is_lambda());
    assert!(matches!(
        resolver.register(&lambda),
        Err(Error::InvalidArgument(_))
    ));

    let info = resolver.get_or_create_class_info(&lambda).expect("stub");
    assert!(info.is_dynamic());
    assert_eq!(info.class_id(), ClassId::LAMBDA_STUB);
    assert!(info.package_name_bytes().is_none());

    let proxy = class("jdk.proxy1.$Proxy12");
    let info = resolver.get_or_create_class_info(&proxy).expect("stub");
    assert_eq!(info.class_id(), ClassId::PROXY_STUB);
}

#[test]
fn strict_mode_requires_registration() {
    let resolver = strict_resolver();
    let widget = class("com.acme.Widget");
    assert!(matches!(
        resolver.get_or_create_class_info(&widget),
        Err(Error::RegistrationRequired(ref name)) if name == "com.acme.Widget"
    ));
    resolver.register(&widget).expect("register");
    assert!(resolver.get_or_create_class_info(&widget).is_ok());
}

#[test]
fn replacement_identity_is_separate_and_named() {
    let resolver = resolver();
    let widget = class("com.acme.Widget");
    resolver.register(&widget).expect("register");

    let replacement = resolver
        .class_info_for_replacement(&widget)
        .expect("replacement");
    assert_eq!(replacement.class_id(), ClassId::REPLACE_STUB);
    assert!(replacement.uses_name_path());
    let again = resolver
        .class_info_for_replacement(&widget)
        .expect("replacement");
    assert!(Arc::ptr_eq(&replacement, &again));

    let regular = resolver.get_or_create_class_info(&widget).expect("regular");
    assert!(!regular.uses_name_path());
}

#[test]
fn tags_rebuild_and_index_the_identity() {
    let resolver = ClassResolver::new(
        ResolverConfig::for_language(Language::Python),
        Arc::new(MetaStringResolver::new()),
    )
    .expect("resolver");
    let point = class("com.acme.Point");
    let tagged = resolver.register_tag(&point, "acme.Point").expect("tag");
    assert!(tagged.tag_bytes().is_some());
    assert!(tagged.full_name_bytes().is_some());

    let current = resolver.get_or_create_class_info(&point).expect("info");
    assert!(Arc::ptr_eq(&tagged, &current));
    let by_tag = resolver
        .class_info_by_tag("acme.Point")
        .expect("encode")
        .expect("indexed");
    assert!(Arc::ptr_eq(&tagged, &by_tag));
    assert!(resolver
        .class_info_by_tag("acme.Missing")
        .expect("encode")
        .is_none());
}

#[test]
fn serializer_rebind_is_visible_through_the_cache() {
    let resolver = resolver();
    let widget = class("com.acme.Widget");
    assert!(resolver
        .set_serializer(&widget, Arc::new(Named("generic")))
        .expect("bind")
        .is_none());
    let previous = resolver
        .set_serializer(&widget, Arc::new(Named("jit")))
        .expect("rebind")
        .expect("previous");
    assert_eq!(previous.name(), "generic");
    let info = resolver.get_or_create_class_info(&widget).expect("info");
    assert_eq!(info.serializer().expect("bound").name(), "jit");
}

#[test]
fn read_resolves_ids_and_names() {
    let strings = Arc::new(MetaStringResolver::new());
    let writer = ClassResolver::new(ResolverConfig::default(), Arc::clone(&strings)).expect("writer");
    let reader = ClassResolver::new(ResolverConfig::default(), strings).expect("reader");

    let widget = class("com.acme.Widget");
    let grid = ClassDescriptor::array_of(ClassDescriptor::enumeration("com.acme.Color"), 2).into_ref();
    let string = class("java.lang.String");

    let mut buffer = [0u8; 128];
    let mut cursor = CursorMut::new(&mut buffer);
    let mut write_session = WriteSession::new();
    for shape in [&widget, &grid, &string, &widget] {
        writer
            .write_class_info(&mut cursor, &mut write_session, shape)
            .expect("write");
    }
    let written = cursor.written().to_vec();

    let mut read_cursor = Cursor::new(&written);
    let mut read_session = ReadSession::new();
    let read: Vec<_> = (0..4)
        .map(|_| {
            reader
                .read_class_info(&mut read_cursor, &mut read_session)
                .expect("read")
        })
        .collect();
    assert!(read_cursor.is_eof());

    let names: Vec<String> = read
        .iter()
        .map(|info| info.key().expect("class").to_string())
        .collect();
    assert_eq!(
        names,
        [
            "com.acme.Widget",
            "com.acme.Color[][]",
            "java.lang.String",
            "com.acme.Widget"
        ]
    );
    assert!(Arc::ptr_eq(&read[0], &read[3]));
    let component = read[1].class().expect("grid");
    let (inner, depth) = component.array_component().expect("array");
    assert_eq!(depth, 2);
    assert!(inner.is_enum());
}

#[test]
fn strict_reader_rejects_unknown_names() {
    let strings = Arc::new(MetaStringResolver::new());
    let writer = ClassResolver::new(ResolverConfig::default(), Arc::clone(&strings)).expect("writer");
    let reader = ClassResolver::new(
        ResolverConfig {
            require_class_registration: true,
            ..ResolverConfig::default()
        },
        strings,
    )
    .expect("reader");

    let mut buffer = [0u8; 64];
    let mut cursor = CursorMut::new(&mut buffer);
    writer
        .write_class_info(&mut cursor, &mut WriteSession::new(), &class("com.acme.Widget"))
        .expect("write");
    let written = cursor.written().to_vec();

    let err = reader
        .read_class_info(&mut Cursor::new(&written), &mut ReadSession::new())
        .unwrap_err();
    assert!(matches!(
        err,
        Error::UnknownClassName { ref package, ref name } if package == "com.acme" && name == "Widget"
    ));
}

/// Bytes a peer produces when it treats `name` as an ordinary named class.
fn named_header(name: &str) -> Vec<u8> {
    let writer = resolver();
    let mut buffer = [0u8; 128];
    let mut cursor = CursorMut::new(&mut buffer);
    writer
        .write_class_info(
            &mut cursor,
            &mut WriteSession::new(),
            &ClassDescriptor::class(name).into_ref(),
        )
        .expect("write");
    cursor.written().to_vec()
}

#[test]
fn dynamic_names_never_resolve_on_read() {
    let reader = resolver();
    let cached = reader
        .get_or_create_class_info(&ClassDescriptor::lambda("com.acme.Main$$Lambda$14").into_ref())
        .expect("lambda");
    assert!(cached.is_dynamic());

    for name in [
        "com.acme.Main$$Lambda$14",
        "com.acme.Other$$Lambda$7",
        "com.sun.proxy.$Proxy4",
    ] {
        let written = named_header(name);
        let err = reader
            .read_class_info(&mut Cursor::new(&written), &mut ReadSession::new())
            .unwrap_err();
        assert!(
            matches!(err, Error::UnknownClassName { .. }),
            "{name} resolved: {err:?}"
        );
    }

    // nothing was materialized for the uncached names
    assert!(reader.cache.get("com.acme.Other$$Lambda$7").is_none());
    assert!(reader.cache.get("com.sun.proxy.$Proxy4").is_none());
}

#[test]
fn rebind_on_a_stale_record_survives_registration() {
    let resolver = resolver();
    let widget = class("com.acme.Widget");
    let stale = resolver.get_or_create_class_info(&widget).expect("info");

    resolver.register(&widget).expect("register");
    stale.set_serializer(Arc::new(Named("late")));
    let registered = resolver.get_or_create_class_info(&widget).expect("info");
    assert!(!Arc::ptr_eq(&stale, &registered));
    assert_eq!(registered.serializer().expect("shared").name(), "late");

    let tagged = resolver.register_tag(&widget, "acme.Widget").expect("tag");
    registered.set_serializer(Arc::new(Named("later")));
    assert_eq!(tagged.serializer().expect("shared").name(), "later");
    assert_eq!(stale.serializer().expect("shared").name(), "later");
}

#[test]
fn registration_racing_rebinds_keeps_the_last_binding() {
    let resolver = Arc::new(resolver());
    let widget = class("com.acme.Widget");
    let barrier = Arc::new(std::sync::Barrier::new(2));

    let binder = {
        let resolver = Arc::clone(&resolver);
        let widget = Arc::clone(&widget);
        let barrier = Arc::clone(&barrier);
        std::thread::spawn(move || {
            barrier.wait();
            for version in 0..200 {
                let name: &'static str = if version % 2 == 0 { "even" } else { "odd" };
                resolver
                    .set_serializer(&widget, Arc::new(Named(name)))
                    .expect("bind");
            }
        })
    };
    barrier.wait();
    resolver.register(&widget).expect("register");
    binder.join().expect("binder should succeed");

    let info = resolver.get_or_create_class_info(&widget).expect("info");
    assert!(!info.uses_name_path());
    // 200 binds, the last one is "odd"
    assert_eq!(info.serializer().expect("bound").name(), "odd");
}

#[test]
fn unknown_id_is_reported() {
    let resolver = resolver();
    let mut buffer = [0u8; 4];
    let mut cursor = CursorMut::new(&mut buffer);
    cursor.write_var_u32(900 << 1).expect("write");
    let written = cursor.written().to_vec();
    let err = resolver
        .read_class_info(&mut Cursor::new(&written), &mut ReadSession::new())
        .unwrap_err();
    assert!(matches!(err, Error::UnknownClassId(900)));
}

#[test]
fn invalid_config_is_rejected() {
    let config = ResolverConfig {
        initial_capacity: 0,
        ..ResolverConfig::default()
    };
    assert!(matches!(
        ClassResolver::new(config, Arc::new(MetaStringResolver::new())),
        Err(Error::Config(_))
    ));
}
