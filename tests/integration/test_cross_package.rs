//! Resolution across packages of the module and into third-party imports

use crate::common::*;
use go2type::ResolveError;

fn write_handler(project: &TestProject, output_type: &str) {
    project.write_file(
        "api/handlers.go",
        &format!(
            "package api\n\n// @Method GET\n// @Path /things\n// @Output {}\nfunc ListHandler() {{}}\n",
            output_type
        ),
    );
}

#[test]
fn test_same_named_types_from_two_packages() {
    let project = TestProject::new();
    write_handler(&project, "Combined");
    project.write_file(
        "api/combined.go",
        r#"package api

import (
    "example.com/app/alpha"
    "example.com/app/beta"
)

type Combined struct {
    A alpha.Info   `json:"a"`
    B *beta.Info   `json:"b"`
    C []alpha.Info `json:"c"`
}
"#,
    );
    project.write_file("alpha/info.go", "package alpha\n\ntype Info struct {\n    X int `json:\"x\"`\n}\n");
    project.write_file("beta/info.go", "package beta\n\ntype Info struct {\n    Y string `json:\"y\"`\n}\n");

    let output = project.analyze("api");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    assert_eq!(used_type_names(&output), vec!["Combined", "AlphaInfo", "BetaInfo"]);
    assert_eq!(field_type(&output, "Combined", "A").as_deref(), Some("AlphaInfo"));
    assert_eq!(field_type(&output, "Combined", "B").as_deref(), Some("BetaInfo | null"));
    assert_eq!(field_type(&output, "Combined", "C").as_deref(), Some("Array<AlphaInfo>"));
    assert_eq!(field_type(&output, "AlphaInfo", "X").as_deref(), Some("number"));
    assert_eq!(field_type(&output, "BetaInfo", "Y").as_deref(), Some("string"));
    assert_eq!(
        output.used_type("AlphaInfo").unwrap().qualified_name,
        "example.com/app/alpha.Info"
    );
}

#[test]
fn test_internal_package_resolves_its_own_imports() {
    let project = TestProject::new();
    write_handler(&project, "Envelope");
    project.write_file(
        "api/envelope.go",
        "package api\n\nimport m \"example.com/app/models\"\n\ntype Envelope struct {\n    Owner m.User `json:\"owner\"`\n}\n",
    );
    project.write_file(
        "models/user.go",
        r#"package models

import (
    "time"

    "github.com/google/uuid"
)

type User struct {
    ID      uuid.UUID `json:"id"`
    Created time.Time `json:"created"`
    Manager *User     `json:"manager"`
}
"#,
    );

    let output = project.analyze("api");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    assert_eq!(field_type(&output, "Envelope", "Owner").as_deref(), Some("ModelsUser"));
    assert_eq!(
        field_type(&output, "ModelsUser", "ID").as_deref(),
        Some("string /* uuid */")
    );
    assert_eq!(
        field_type(&output, "ModelsUser", "Created").as_deref(),
        Some("string /* date-time */")
    );
    assert_eq!(
        field_type(&output, "ModelsUser", "Manager").as_deref(),
        Some("ModelsUser | null")
    );
}

#[test]
fn test_unmapped_third_party_type_is_a_field_error() {
    let project = TestProject::new();
    write_handler(&project, "Account");
    project.write_file(
        "api/account.go",
        r#"package api

import "github.com/shopspring/decimal"

type Account struct {
    Balance decimal.Decimal `json:"balance"`
    Owner   string          `json:"owner"`
}
"#,
    );

    let output = project.analyze("api");
    assert_eq!(output.diagnostics.len(), 1);
    assert_eq!(output.diagnostics[0].field, "Balance");
    assert!(matches!(
        output.diagnostics[0].error,
        ResolveError::NoExternalMapping { .. }
    ));
    assert_eq!(field_type(&output, "Account", "Balance"), None);
    assert_eq!(field_type(&output, "Account", "Owner").as_deref(), Some("string"));

    let mapped = project.analyze_with("api", &mappings(&[("decimal.Decimal", "string")]));
    assert!(mapped.diagnostics.is_empty());
    assert_eq!(field_type(&mapped, "Account", "Balance").as_deref(), Some("string"));
}

#[test]
fn test_user_mapping_overrides_internal_struct() {
    let project = TestProject::new();
    write_handler(&project, "Wrapper");
    project.write_file(
        "api/wrapper.go",
        "package api\n\nimport \"example.com/app/money\"\n\ntype Wrapper struct {\n    Amount money.Amount `json:\"amount\"`\n}\n",
    );
    project.write_file(
        "money/amount.go",
        "package money\n\ntype Amount struct {\n    Cents int64\n}\n",
    );

    let output = project.analyze_with("api", &mappings(&[("money.Amount", "number")]));
    assert_eq!(field_type(&output, "Wrapper", "Amount").as_deref(), Some("number"));
    assert_eq!(used_type_names(&output), vec!["Wrapper"]);
}

#[test]
fn test_missing_internal_type_is_diagnosed() {
    let project = TestProject::new();
    write_handler(&project, "Holder");
    project.write_file(
        "api/holder.go",
        "package api\n\nimport \"example.com/app/alpha\"\n\ntype Holder struct {\n    Ghost alpha.Ghost\n    Kept  bool\n}\n",
    );
    project.write_file("alpha/info.go", "package alpha\n\ntype Info struct {\n    X int\n}\n");

    let output = project.analyze("api");
    assert_eq!(output.diagnostics.len(), 1);
    assert!(matches!(
        output.diagnostics[0].error,
        ResolveError::TypeNotFound { .. }
    ));
    assert_eq!(field_type(&output, "Holder", "Kept").as_deref(), Some("boolean"));
}

#[test]
fn test_named_scalar_from_internal_package_is_inlined() {
    let project = TestProject::new();
    write_handler(&project, "Order");
    project.write_file(
        "api/order.go",
        "package api\n\nimport \"example.com/app/status\"\n\ntype Order struct {\n    State status.Code `json:\"state\"`\n    Codes []status.Code `json:\"codes\"`\n}\n",
    );
    project.write_file("status/code.go", "package status\n\ntype Code string\n");

    let output = project.analyze("api");
    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    assert_eq!(field_type(&output, "Order", "State").as_deref(), Some("string"));
    assert_eq!(field_type(&output, "Order", "Codes").as_deref(), Some("Array<string>"));
}
