//! Loading variables from files, directories and `ZENFIG_VARS_PATH`.

use serial_test::serial;
use std::path::PathBuf;

use zenfig::core::ZenfigError;
use zenfig::models::Value;
use zenfig::resolver::{ResolverOptions, resolve};
use zenfig::templating::Registry;
use zenfig::test_utils::TestWorkspace;
use zenfig::variables::{VARS_PATH_ENV, load_variables, search_path_from_env};

#[tokio::test]
async fn test_files_and_directories_merge_in_order() {
    let workspace = TestWorkspace::new().unwrap();
    workspace.write("defaults.yaml", "accent: red\nfont: Hack\n").unwrap();
    workspace
        .write("theme/00-colors.yaml", "accent: '1a1a1a'\nbg: '{{ @accent|norm_hex }}'\n")
        .unwrap();
    workspace.write("theme/10-fonts.yaml", "font: Iosevka\nsize: 12\n").unwrap();
    workspace.write("local.yaml", "size: 14\n").unwrap();

    let sources = [
        workspace.path().join("defaults.yaml"),
        workspace.path().join("theme"),
        workspace.path().join("local.yaml"),
    ];
    let vars = load_variables(&sources).await.unwrap();

    assert_eq!(vars["accent"], Value::from("1a1a1a"));
    assert_eq!(vars["font"], Value::from("Iosevka"));
    assert_eq!(vars["size"], Value::Integer(14));

    let (resolved, _) =
        resolve(vars, Registry::with_builtins(), ResolverOptions::default()).unwrap();
    assert_eq!(resolved["bg"], Value::from("#1a1a1a"));
}

#[tokio::test]
async fn test_non_mapping_document_is_rejected() {
    let workspace = TestWorkspace::new().unwrap();
    let list = workspace.write("list.yaml", "- one\n- two\n").unwrap();

    let err = load_variables(&[list]).await.unwrap_err();
    let ZenfigError::MalformedVariables { path, reason } = err else {
        panic!("expected a malformed variables error");
    };
    assert!(path.ends_with("list.yaml"));
    assert!(reason.contains("mapping"));
}

#[tokio::test]
async fn test_yaml_scalars_keep_their_types() {
    let workspace = TestWorkspace::new().unwrap();
    let file = workspace
        .write("types.yaml", "int: 3\nfloat: 1.5\nbool: true\nnull_value: ~\n4: numeric key\n")
        .unwrap();

    let vars = load_variables(&[file]).await.unwrap();
    assert_eq!(vars["int"], Value::Integer(3));
    assert_eq!(vars["float"], Value::Float(1.5));
    assert_eq!(vars["bool"], Value::Bool(true));
    assert_eq!(vars["null_value"], Value::Null);
    assert_eq!(vars["4"], Value::from("numeric key"));
}

#[test]
#[serial]
fn test_search_path_from_env() {
    // SAFETY: serialized with every other test that touches the environment
    unsafe { std::env::set_var(VARS_PATH_ENV, "/a/vars:relative dir") };
    let paths = search_path_from_env().unwrap();
    assert_eq!(paths, vec![PathBuf::from("/a/vars"), PathBuf::from("relative dir")]);

    unsafe { std::env::set_var(VARS_PATH_ENV, "/a::/b") };
    let err = search_path_from_env().unwrap_err();
    assert!(matches!(err, ZenfigError::InvalidSearchPath { ref value } if value == "/a::/b"));

    unsafe { std::env::remove_var(VARS_PATH_ENV) };
    assert!(search_path_from_env().unwrap().is_empty());
}
