//! Handler annotations read from package sources

use crate::common::*;
use go2type::HeaderSource;

#[test]
fn test_handler_directives_and_headers() {
    let project = TestProject::new();
    project.write_file(
        "api/posts.go",
        r#"package api

type Post struct {
    Title string `json:"title"`
}

// GetPostHandler returns a single post.
// @Method GET
// @Path /users/:id/posts/:postId
// @Output Post
// @Header localStorage:X-Auth-Token:auth_token
// @Header input:Content-Type
// @Header X-Custom
func GetPostHandler() {}

// helper has no directives and is not a handler
func helper() {}
"#,
    );

    let output = project.analyze("api");
    assert_eq!(output.handlers.len(), 1);

    let handler = output.handler("GetPost").unwrap();
    assert_eq!(handler.method, "GET");
    assert_eq!(handler.path, "/users/:id/posts/:postId");
    assert_eq!(handler.url_params, vec!["id", "postId"]);
    assert_eq!(handler.input_type, "");
    assert_eq!(handler.output_type, "Post");
    assert!(handler.file_path.ends_with("posts.go"));

    let auth = &handler.headers[0];
    assert_eq!(auth.header_key, "X-Auth-Token");
    assert_eq!(auth.source, HeaderSource::LocalStorage);
    assert_eq!(auth.storage_key, "auth_token");
    assert_eq!(auth.safe_name, "x_auth_token");

    let content_type = &handler.headers[1];
    assert_eq!(content_type.header_key, "Content-Type");
    assert_eq!(content_type.source, HeaderSource::Input);
    assert_eq!(content_type.storage_key, "");

    let custom = &handler.headers[2];
    assert_eq!(custom.header_key, "X-Custom");
    assert_eq!(custom.source, HeaderSource::Input);
    assert_eq!(custom.storage_key, "");

    assert_eq!(handler.input_headers().count(), 2);
}

#[test]
fn test_handler_without_path_is_ignored() {
    let project = TestProject::new();
    project.write_file(
        "api/handlers.go",
        r#"package api

// @Method DELETE
func DeleteHandler() {}

// @Method GET
// @Path /health
func healthHandler() {}
"#,
    );

    let output = project.analyze("api");
    assert_eq!(output.handlers.len(), 1);
    assert_eq!(output.handlers[0].name, "Health");
    assert!(output.handlers[0].url_params.is_empty());
    assert!(output.used_types.is_empty());
}

#[test]
fn test_end_to_end_user_lookup() {
    let project = TestProject::new();
    project.write_file(
        "api/user.go",
        r#"package api

import "github.com/acme/otherpkg"

type GetUserInput struct {
    ID int `json:"id"`
}

type User struct {
    ID   int                    `json:"id"`
    Name string                 `json:"name"`
    Info otherpkg.OtherPkgType  `json:"info"`
}

type AuditLog struct {
    Entry string
}

// @Method GET
// @Path /users/:id
// @Input GetUserInput
// @Output User
func GetUserHandler() {}
"#,
    );

    let output = project.analyze_with("api", &mappings(&[("otherpkg.OtherPkgType", "string")]));

    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    assert_eq!(used_type_names(&output), vec!["GetUserInput", "User"]);
    assert_eq!(field_type(&output, "User", "Info").as_deref(), Some("string"));
    assert_eq!(field_type(&output, "User", "ID").as_deref(), Some("number"));

    let handler = output.handler("GetUser").unwrap();
    assert_eq!(handler.input_type, "GetUserInput");
    assert_eq!(handler.output_type, "User");
    assert_eq!(output.package, "api");
    assert_eq!(output.import_path, "example.com/app/api");
    assert_eq!(output.module, MODULE);
}

#[test]
fn test_end_to_end_with_bare_mapped_type() {
    let project = TestProject::new();
    project.write_file(
        "api/user.go",
        r#"package api

type GetUserInput struct {
    ID int `json:"id"`
}

type User struct {
    ID   int          `json:"id"`
    Name string       `json:"name"`
    Info OtherPkgType `json:"info"`
}

// @Method GET
// @Path /users/:id
// @Input GetUserInput
// @Output User
func GetUser() {}
"#,
    );

    let output = project.analyze_with("api", &mappings(&[("OtherPkgType", "string")]));

    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    let mut names = used_type_names(&output);
    names.sort();
    assert_eq!(names, vec!["GetUserInput", "User"]);
    assert_eq!(field_type(&output, "User", "Info").as_deref(), Some("string"));
    assert_eq!(field_type(&output, "User", "Name").as_deref(), Some("string"));

    let handler = output.handler("GetUser").unwrap();
    assert_eq!(handler.input_type, "GetUserInput");
    assert_eq!(handler.output_type, "User");
}
