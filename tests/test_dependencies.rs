//! Scenario tests for `DependsOn` / `AlsoNotify` propagation.

mod common;

use common::*;
use inpc::analysis::{Forward, MethodEmission, RaiseMechanism};
use inpc::base::Location;
use inpc::model::{
    Accessibility, AnnotatedMember, ExistingMember, Family, Modifiers, ParamType, TypeDescriptor,
    TypeGraph,
};
use rstest::rstest;

fn view_model() -> TypeDescriptor {
    TypeDescriptor::partial(id("SomeViewModel"), loc(20, 33))
}

fn string_field(name: &str, location: Location) -> AnnotatedMember {
    AnnotatedMember::notify_field(name, "string", location)
}

fn int_field(name: &str, location: Location) -> AnnotatedMember {
    AnnotatedMember::notify_field(name, "int", location)
}

#[test]
fn test_notifies_depends_on_property() {
    let graph = TypeGraph::new().with(
        view_model()
            .with_annotated(string_field("_foo", loc(60, 64)))
            .with_annotated(
                AnnotatedMember::property("Bar", "string", loc(90, 93))
                    .depends_on(["Foo"], loc(70, 85)),
            ),
    );
    let plans = analyze(&graph);
    let plan = plan_of(&plans, "SomeViewModel");

    assert_eq!(names(plan, "Foo", Family::Changed), vec!["Foo", "Bar"]);
    // Bar is hand-written; only Foo is generated.
    assert_eq!(plan.properties.len(), 1);
    assert!(plan.diagnostics.is_empty());
}

#[test]
fn test_notifies_generated_depends_on_property() {
    let graph = TypeGraph::new().with(
        view_model()
            .with_annotated(string_field("_foo", loc(60, 64)))
            .with_annotated(string_field("_bar", loc(90, 94)).depends_on(["Foo"], loc(70, 85))),
    );
    let plans = analyze(&graph);
    let plan = plan_of(&plans, "SomeViewModel");

    assert_eq!(names(plan, "Foo", Family::Changed), vec!["Foo", "Bar"]);
    assert_eq!(names(plan, "Bar", Family::Changed), vec!["Bar"]);
    assert!(plan.changed.forwards.is_empty());
}

#[test]
fn test_notifies_property_which_does_not_exist_from_raise_method() {
    let graph = TypeGraph::new().with(
        view_model()
            .with_annotated(string_field("_bar", loc(90, 94)).depends_on(["Foo"], loc(70, 85))),
    );
    let plans = analyze(&graph);
    let plan = plan_of(&plans, "SomeViewModel");

    assert_eq!(
        plan.changed.forwards,
        vec![Forward {
            source: "Foo".into(),
            notified: vec!["Bar".into()],
        }]
    );
    assert!(matches!(plan.changed.emission, MethodEmission::Define { .. }));
    assert!(plan.diagnostics.is_empty());
}

#[test]
fn test_depends_on_field_without_notify() {
    let graph = TypeGraph::new().with(
        view_model()
            .with_annotated(string_field("_foo", loc(60, 64)))
            .with_annotated(
                AnnotatedMember::field("_bar", "string", loc(90, 94))
                    .depends_on(["Foo"], loc(70, 85)),
            ),
    );
    let plans = analyze(&graph);
    let plan = plan_of(&plans, "SomeViewModel");

    assert_eq!(codes(plan), vec!["INPC011"]);
    assert_eq!(plan.diagnostics[0].location, loc(70, 85));
    // The edge is kept.
    assert_eq!(names(plan, "Foo", Family::Changed), vec!["Foo", "Bar"]);
}

#[test]
fn test_ignores_empty_and_null_names() {
    let graph = TypeGraph::new().with(
        view_model().with_annotated(
            AnnotatedMember::field("_foo", "string", loc(60, 64))
                .depends_on_raw(vec![Some("".into()), None], loc(40, 55)),
        ),
    );
    let plans = analyze(&graph);
    let plan = plan_of(&plans, "SomeViewModel");

    assert!(plan.properties.is_empty());
    assert!(plan.diagnostics.is_empty());
    assert!(plan.changed.forwards.is_empty());
}

#[test]
fn test_user_specified_raise_method_cannot_raise_dependency() {
    let graph = TypeGraph::new().with(
        view_model()
            .implementing(INPC)
            .with_member(event("SomeViewModel", Family::Changed))
            .with_member(ExistingMember::method(
                id("SomeViewModel"),
                "OnPropertyChanged",
                [ParamType::String],
                loc(40, 57),
            ))
            .with_annotated(string_field("_bar", loc(90, 94)).depends_on(["Foo"], loc(70, 85))),
    );
    let plans = analyze(&graph);
    let plan = plan_of(&plans, "SomeViewModel");

    assert!(matches!(plan.changed.mechanism, RaiseMechanism::FoundOnThisType(_)));
    assert_eq!(codes(plan), vec!["INPC023"]);
    assert_eq!(plan.diagnostics[0].location, loc(70, 85));
    assert!(plan.changed.forwards.is_empty());
}

#[test]
fn test_non_virtual_base_cannot_raise_dependency() {
    let graph = TypeGraph::new()
        .with(
            TypeDescriptor::partial(id("Base"), loc(0, 4))
                .implementing(INPC)
                .with_member(event("Base", Family::Changed))
                .with_member(method(
                    "Base",
                    "OnPropertyChanged",
                    [ParamType::String],
                    Accessibility::Protected,
                    Modifiers::NONE,
                    loc(5, 22),
                )),
        )
        .with(
            TypeDescriptor::partial(id("Derived"), loc(50, 57))
                .with_base(id("Base"))
                .with_annotated(string_field("_bar", loc(90, 94)).depends_on(["Foo"], loc(70, 85))),
        );
    let plans = analyze(&graph);
    let plan = plan_of(&plans, "Derived");

    assert_eq!(codes(plan), vec!["INPC022", "INPC023"]);
    assert_eq!(plan.diagnostics[0].location, loc(5, 22));
    assert_eq!(plan.diagnostics[1].location, loc(70, 85));
}

#[test]
fn test_uses_short_name_for_explicitly_implemented_property() {
    let graph = TypeGraph::new().with(
        view_model()
            .implementing("I1")
            .with_member(
                ExistingMember::property(id("SomeViewModel"), "Foo", "string", loc(100, 106))
                    .with_explicit_interface("I1"),
            )
            .with_annotated(string_field("_bar", loc(60, 64)))
            .with_annotated(
                AnnotatedMember::property("Foo", "string", loc(100, 106))
                    .with_explicit_interface("I1")
                    .depends_on(["Bar"], loc(80, 95)),
            ),
    );
    let plans = analyze(&graph);
    let plan = plan_of(&plans, "SomeViewModel");

    assert_eq!(names(plan, "Bar", Family::Changed), vec!["Bar", "Foo"]);
    assert!(plan.diagnostics.is_empty());
}

#[test]
fn test_derived_type_overrides_generated_base_method_to_forward() {
    let graph = TypeGraph::new()
        .with(
            TypeDescriptor::partial(id("Base"), loc(0, 4))
                .with_annotated(string_field("_foo", loc(5, 9))),
        )
        .with(
            TypeDescriptor::partial(id("Derived"), loc(50, 57))
                .with_base(id("Base"))
                .with_annotated(string_field("_bar", loc(90, 94)).depends_on(["Foo"], loc(70, 85))),
        );
    let plans = analyze(&graph);
    let plan = plan_of(&plans, "Derived");

    assert!(matches!(
        plan.changed.mechanism,
        RaiseMechanism::FoundOnBaseRequiresOverride { degraded: false, .. }
    ));
    assert_eq!(plan.changed.emission, MethodEmission::Override);
    assert_eq!(plan.changed.forwards.len(), 1);
    assert_eq!(plan.changed.forwards[0].source, "Foo");
    assert!(plan.diagnostics.is_empty());
}

#[test]
fn test_also_notify() {
    let graph = TypeGraph::new().with(
        view_model()
            .with_annotated(
                string_field("_foo", loc(60, 64)).also_notify(["Bar", "Baz"], loc(50, 58)),
            )
            .with_annotated(AnnotatedMember::property("Bar", "string", loc(90, 93))),
    );
    let plans = analyze(&graph);
    let plan = plan_of(&plans, "SomeViewModel");

    assert_eq!(names(plan, "Foo", Family::Changed), vec!["Foo", "Bar", "Baz"]);
    assert!(plan.diagnostics.is_empty());
}

#[test]
fn test_self_dependency_is_info() {
    let graph = TypeGraph::new().with(
        view_model()
            .with_annotated(string_field("_foo", loc(60, 64)).depends_on(["Foo"], loc(40, 55))),
    );
    let plans = analyze(&graph);
    let plan = plan_of(&plans, "SomeViewModel");

    assert_eq!(codes(plan), vec!["INPC031"]);
    assert_eq!(plan.diagnostics[0].severity, inpc::Severity::Info);
    assert_eq!(names(plan, "Foo", Family::Changed), vec!["Foo"]);
}

// ============================================================================
// CYCLES
// ============================================================================

#[test]
fn test_two_property_cycle_reported_once() {
    let graph = TypeGraph::new().with(
        view_model()
            .with_annotated(int_field("_a", loc(60, 62)).depends_on(["B"], loc(50, 58)))
            .with_annotated(int_field("_b", loc(80, 82)).depends_on(["A"], loc(70, 78))),
    );
    let plans = analyze(&graph);
    let plan = plan_of(&plans, "SomeViewModel");

    assert_eq!(codes(plan), vec!["INPC030"]);
    assert_eq!(plan.diagnostics[0].location, loc(50, 58));
    assert_eq!(names(plan, "A", Family::Changed), vec!["A"]);
    assert_eq!(names(plan, "B", Family::Changed), vec!["B"]);
}

#[test]
fn test_distinct_cycles_each_reported() {
    let graph = TypeGraph::new().with(
        view_model()
            .with_annotated(int_field("_a", loc(10, 12)).depends_on(["C"], loc(0, 8)))
            .with_annotated(int_field("_b", loc(30, 32)).depends_on(["A"], loc(20, 28)))
            .with_annotated(int_field("_c", loc(50, 52)).depends_on(["B"], loc(40, 48)))
            .with_annotated(int_field("_x", loc(70, 72)).depends_on(["Y"], loc(60, 68)))
            .with_annotated(int_field("_y", loc(90, 92)).depends_on(["X"], loc(80, 88)))
            .with_annotated(int_field("_z", loc(110, 112)).depends_on(["X"], loc(100, 108))),
    );
    let plans = analyze(&graph);
    let plan = plan_of(&plans, "SomeViewModel");

    assert_eq!(codes(plan), vec!["INPC030", "INPC030"]);
    // Edges leaving a cycle are still followed.
    assert_eq!(names(plan, "X", Family::Changed), vec!["X", "Z"]);
}

#[test]
fn test_cycles_sharing_a_property_reported_once() {
    let graph = TypeGraph::new().with(
        view_model()
            .with_annotated(int_field("_a", loc(10, 12)).depends_on(["B"], loc(0, 8)))
            .with_annotated(int_field("_b", loc(30, 32)).depends_on(["A", "C"], loc(20, 28)))
            .with_annotated(int_field("_c", loc(50, 52)).depends_on(["B"], loc(40, 48)))
            .with_annotated(int_field("_d", loc(70, 72)).depends_on(["C"], loc(60, 68))),
    );
    let plans = analyze(&graph);
    let plan = plan_of(&plans, "SomeViewModel");

    // A <-> B and B <-> C form one component.
    assert_eq!(codes(plan), vec!["INPC030"]);
    assert_eq!(names(plan, "A", Family::Changed), vec!["A"]);
    assert_eq!(names(plan, "B", Family::Changed), vec!["B"]);
    assert_eq!(names(plan, "C", Family::Changed), vec!["C", "D"]);
}

// ============================================================================
// ORDER INDEPENDENCE
// ============================================================================

#[rstest]
#[case::declared(&["A", "B"], &["C"])]
#[case::reversed(&["C", "B"], &["A"])]
#[case::split(&["B"], &["C", "A"])]
fn test_closure_independent_of_annotation_order(
    #[case] first: &[&str],
    #[case] second: &[&str],
) {
    let graph = TypeGraph::new().with(
        view_model()
            .with_annotated(int_field("_a", loc(0, 2)))
            .with_annotated(int_field("_b", loc(3, 5)).depends_on(["A"], loc(3, 5)))
            .with_annotated(int_field("_c", loc(6, 8)).depends_on(["A"], loc(6, 8)))
            .with_annotated(
                int_field("_d", loc(9, 11))
                    .depends_on(first.iter().copied(), loc(12, 14))
                    .depends_on(second.iter().copied(), loc(15, 17)),
            ),
    );
    let plans = analyze(&graph);
    let plan = plan_of(&plans, "SomeViewModel");

    assert_eq!(names(plan, "A", Family::Changed), vec!["A", "B", "D", "C"]);
    assert_eq!(names(plan, "B", Family::Changed), vec!["B", "D"]);
    assert_eq!(names(plan, "C", Family::Changed), vec!["C", "D"]);
    assert_eq!(names(plan, "D", Family::Changed), vec!["D"]);
    assert!(plan.diagnostics.is_empty());
}
