//! Field type resolution within a single package

use crate::common::*;

const HANDLERS: &str = r#"package api

// @Method POST
// @Path /records
// @Input Record
// @Output Record
func CreateRecordHandler() {}
"#;

#[test]
fn test_primitive_fields() {
    let project = TestProject::new();
    project.write_file("api/handlers.go", HANDLERS);
    project.write_file(
        "api/record.go",
        r#"package api

type Record struct {
    Count   int     `json:"count"`
    Ratio   float64 `json:"ratio"`
    Label   string  `json:"label"`
    Enabled bool    `json:"enabled"`
    Raw     byte
}
"#,
    );

    let output = project.analyze("api");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    assert_eq!(field_type(&output, "Record", "Count").as_deref(), Some("number"));
    assert_eq!(field_type(&output, "Record", "Ratio").as_deref(), Some("number"));
    assert_eq!(field_type(&output, "Record", "Label").as_deref(), Some("string"));
    assert_eq!(field_type(&output, "Record", "Enabled").as_deref(), Some("boolean"));

    let record = output.used_type("Record").unwrap();
    assert_eq!(record.field("Count").unwrap().serialized_name, "count");
    assert_eq!(record.field("Raw").unwrap().serialized_name, "Raw");
}

#[test]
fn test_pointer_slice_and_map_fields() {
    let project = TestProject::new();
    project.write_file("api/handlers.go", HANDLERS);
    project.write_file(
        "api/record.go",
        r#"package api

type Record struct {
    Note    *string            `json:"note,omitempty"`
    Tags    []string           `json:"tags"`
    Scores  map[string]int     `json:"scores"`
    Parent  *Record            `json:"parent"`
    History []*Record          `json:"history"`
    Fixed   [4]int             `json:"fixed"`
}
"#,
    );

    let output = project.analyze("api");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);

    assert_eq!(field_type(&output, "Record", "Note").as_deref(), Some("string | null"));
    assert_eq!(field_type(&output, "Record", "Tags").as_deref(), Some("Array<string>"));
    assert_eq!(
        field_type(&output, "Record", "Scores").as_deref(),
        Some("{ [key: string]: number }")
    );
    assert_eq!(field_type(&output, "Record", "Parent").as_deref(), Some("Record | null"));
    assert_eq!(
        field_type(&output, "Record", "History").as_deref(),
        Some("Array<Record | null>")
    );
    assert_eq!(field_type(&output, "Record", "Fixed").as_deref(), Some("Array<number>"));

    let note = output.used_type("Record").unwrap().field("Note").unwrap();
    assert!(note.is_optional);
    assert!(note.omit_empty);
    assert!(output.used_type("Record").unwrap().field("Tags").unwrap().is_array);
}

#[test]
fn test_skipped_and_embedded_fields_are_not_emitted() {
    let project = TestProject::new();
    project.write_file("api/handlers.go", HANDLERS);
    project.write_file(
        "api/record.go",
        r#"package api

type Base struct {
    ID int
}

type Record struct {
    Base
    Secret string `json:"-"`
    Dash   string `json:"-,"`
    Name   string `json:"name"`
}
"#,
    );

    let output = project.analyze("api");
    let record = output.used_type("Record").unwrap();
    let names: Vec<&str> = record.fields.iter().map(|f| f.source_name.as_str()).collect();
    assert_eq!(names, vec!["Dash", "Name"]);
    assert_eq!(record.field("Dash").unwrap().serialized_name, "-");
}

#[test]
fn test_self_reference_terminates() {
    let project = TestProject::new();
    project.write_file(
        "api/tree.go",
        r#"package api

type Node struct {
    Value    string  `json:"value"`
    Children []*Node `json:"children"`
    Owner    *Owner  `json:"owner"`
}

type Owner struct {
    Root *Node `json:"root"`
}

// @Method GET
// @Path /tree
// @Output Node
func GetTreeHandler() {}
"#,
    );

    let output = project.analyze("api");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    assert_eq!(used_type_names(&output), vec!["Node", "Owner"]);
    assert_eq!(
        field_type(&output, "Node", "Children").as_deref(),
        Some("Array<Node | null>")
    );
    assert_eq!(field_type(&output, "Owner", "Root").as_deref(), Some("Node | null"));
}

#[test]
fn test_only_handler_reachable_types_are_emitted() {
    let project = TestProject::new();
    project.write_file(
        "api/types.go",
        r#"package api

type GetUserInput struct {
    ID int `json:"id"`
}

type User struct {
    Name    string   `json:"name"`
    Profile *Profile `json:"profile"`
}

type Profile struct {
    Bio string `json:"bio"`
}

type Unused struct {
    X int
}

// @Method GET
// @Path /users/:id
// @Input GetUserInput
// @Output User
func GetUserHandler() {}
"#,
    );

    let output = project.analyze("api");
    assert_eq!(
        used_type_names(&output),
        vec!["GetUserInput", "User", "Profile"]
    );
    assert!(output.used_type("Unused").is_none());
}

#[test]
fn test_analysis_is_repeatable() {
    let project = TestProject::new();
    project.write_file("api/handlers.go", HANDLERS);
    project.write_file(
        "api/record.go",
        "package api\n\ntype Record struct {\n    Items []string `json:\"items\"`\n}\n",
    );

    let first = project.analyze("api");
    let second = project.analyze("api");
    assert_eq!(first.used_types, second.used_types);
    assert_eq!(first.handlers, second.handlers);
}

#[test]
fn test_unsupported_field_is_diagnosed_and_pass_continues() {
    let project = TestProject::new();
    project.write_file("api/handlers.go", HANDLERS);
    project.write_file(
        "api/record.go",
        r#"package api

type Record struct {
    Events chan int `json:"events"`
    Name   string   `json:"name"`
}
"#,
    );

    let output = project.analyze("api");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].type_name, "Record");
    assert_eq!(output.diagnostics[0].field, "Events");
    assert_eq!(field_type(&output, "Record", "Events"), None);
    assert_eq!(field_type(&output, "Record", "Name").as_deref(), Some("string"));
}

#[test]
fn test_test_files_are_ignored() {
    let project = TestProject::new();
    project.write_file("api/handlers.go", HANDLERS);
    project.write_file("api/record.go", "package api\n\ntype Record struct {\n    A int\n}\n");
    project.write_file(
        "api/record_test.go",
        "package api\n\ntype Record struct {\n    B string\n}\n",
    );

    let output = project.analyze("api");
    let record = output.used_type("Record").unwrap();
    assert!(record.field("A").is_some());
    assert!(record.field("B").is_none());
}
