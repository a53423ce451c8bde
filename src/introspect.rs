use anyhow::{Context, Result};
use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use syn::visit::Visit;
use walkdir::WalkDir;

/// A place in the analyzed codebase that can carry a documentation comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclarationSite {
    /// A named type (the class-level annotation scope)
    Type(String),
    /// A method on a named type
    Method { type_name: String, method: String },
    /// A free function or registered closure
    Function(String),
}

impl std::fmt::Display for DeclarationSite {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DeclarationSite::Type(name) => write!(f, "{}", name),
            DeclarationSite::Method { type_name, method } => {
                write!(f, "{}::{}", type_name, method)
            }
            DeclarationSite::Function(name) => write!(f, "{}", name),
        }
    }
}

/// Boundary through which the pipeline reads raw comment text.
///
/// The core never touches reflection or the filesystem directly; it asks an
/// introspector for the comment attached to a declaration site and gets
/// back the raw text, or nothing when the site is undocumented or unknown.
pub trait SourceIntrospector: Send + Sync {
    /// Raw comment text of a declaration site, if any
    fn comment_of(&self, site: &DeclarationSite) -> Option<String>;
}

/// In-memory introspector for programmatically registered handlers.
///
/// Useful when routes point at closures rather than source-level methods,
/// and as the comment source in tests.
#[derive(Debug, Default)]
pub struct StaticIntrospector {
    comments: HashMap<DeclarationSite, String>,
}

impl StaticIntrospector {
    /// Create an empty introspector
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach comment text to a declaration site
    pub fn insert(&mut self, site: DeclarationSite, comment: impl Into<String>) {
        self.comments.insert(site, comment.into());
    }

    /// Builder-style variant of [`insert`](Self::insert)
    pub fn with(mut self, site: DeclarationSite, comment: impl Into<String>) -> Self {
        self.insert(site, comment);
        self
    }
}

impl SourceIntrospector for StaticIntrospector {
    fn comment_of(&self, site: &DeclarationSite) -> Option<String> {
        self.comments.get(site).cloned()
    }
}

/// Doc-comment index built from Rust source files.
///
/// `SourceIndex` walks a project directory, parses every `.rs` file with
/// `syn`, and indexes `///` doc comments by declaration site: struct and
/// enum docs become type-level comments, `impl` method docs become
/// method-level comments, and free function docs become function-level
/// comments. Files that fail to read or parse are recorded as warnings and
/// skipped so one broken file never loses the rest of the index.
///
/// # Example
///
/// ```no_run
/// use apidoc_from_routes::introspect::{DeclarationSite, SourceIndex, SourceIntrospector};
/// use std::path::Path;
///
/// let index = SourceIndex::from_dir(Path::new("./my-project")).unwrap();
/// let comment = index.comment_of(&DeclarationSite::Type("UserController".to_string()));
/// println!("{:?}", comment);
/// ```
#[derive(Debug, Default)]
pub struct SourceIndex {
    comments: HashMap<DeclarationSite, String>,
    warnings: Vec<String>,
}

impl SourceIndex {
    /// Builds an index from every Rust file under a directory.
    ///
    /// Skips the `target` directory and hidden directories while walking,
    /// like any tool that scans a Cargo project in place.
    ///
    /// # Errors
    ///
    /// Returns an error only if the root directory itself cannot be walked;
    /// per-file failures become warnings.
    pub fn from_dir(root: &Path) -> Result<Self> {
        let mut index = Self::default();

        for entry in WalkDir::new(root).into_iter().filter_entry(|e| {
            // Don't filter the root directory itself
            if e.path() == root {
                return true;
            }
            let file_name = e.file_name().to_string_lossy();
            !file_name.starts_with('.') && file_name != "target"
        }) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    index.warnings.push(warning);
                    continue;
                }
            };

            let path = entry.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("rs") {
                if let Err(e) = index.index_file(path) {
                    let warning = format!("Failed to index {}: {}", path.display(), e);
                    warn!("{}", warning);
                    index.warnings.push(warning);
                }
            }
        }

        debug!(
            "Indexed {} documented sites ({} warnings)",
            index.comments.len(),
            index.warnings.len()
        );
        Ok(index)
    }

    /// Builds an index from a single source string
    pub fn from_source(source: &str) -> Result<Self> {
        let mut index = Self::default();
        let syntax_tree =
            syn::parse_file(source).context("Failed to parse Rust syntax in source string")?;
        index.index_syntax_tree(&syntax_tree);
        Ok(index)
    }

    /// Warnings collected while building the index
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Number of documented declaration sites in the index
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    /// True when no documented site was found
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    fn index_file(&mut self, path: &Path) -> Result<()> {
        debug!("Indexing file: {}", path.display());

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let syntax_tree = syn::parse_file(&content)
            .with_context(|| format!("Failed to parse Rust syntax in file: {}", path.display()))?;

        self.index_syntax_tree(&syntax_tree);
        Ok(())
    }

    fn index_syntax_tree(&mut self, syntax_tree: &syn::File) {
        let mut visitor = DocVisitor {
            comments: &mut self.comments,
        };
        visitor.visit_file(syntax_tree);
    }
}

impl SourceIntrospector for SourceIndex {
    fn comment_of(&self, site: &DeclarationSite) -> Option<String> {
        self.comments.get(site).cloned()
    }
}

/// Visitor collecting doc comments while traversing the AST
struct DocVisitor<'a> {
    comments: &'a mut HashMap<DeclarationSite, String>,
}

impl<'a, 'ast> Visit<'ast> for DocVisitor<'a> {
    fn visit_item_struct(&mut self, node: &'ast syn::ItemStruct) {
        if let Some(doc) = doc_text(&node.attrs) {
            self.comments
                .insert(DeclarationSite::Type(node.ident.to_string()), doc);
        }
        syn::visit::visit_item_struct(self, node);
    }

    fn visit_item_enum(&mut self, node: &'ast syn::ItemEnum) {
        if let Some(doc) = doc_text(&node.attrs) {
            self.comments
                .insert(DeclarationSite::Type(node.ident.to_string()), doc);
        }
        syn::visit::visit_item_enum(self, node);
    }

    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        if let Some(doc) = doc_text(&node.attrs) {
            self.comments
                .insert(DeclarationSite::Function(node.sig.ident.to_string()), doc);
        }
        syn::visit::visit_item_fn(self, node);
    }

    fn visit_item_impl(&mut self, node: &'ast syn::ItemImpl) {
        let Some(type_name) = impl_type_name(node) else {
            return;
        };

        // Docs on the impl block stand in for the type's own when the
        // struct itself is undocumented or lives in another crate
        if let Some(doc) = doc_text(&node.attrs) {
            self.comments
                .entry(DeclarationSite::Type(type_name.clone()))
                .or_insert(doc);
        }

        for item in &node.items {
            if let syn::ImplItem::Fn(method) = item {
                if let Some(doc) = doc_text(&method.attrs) {
                    self.comments.insert(
                        DeclarationSite::Method {
                            type_name: type_name.clone(),
                            method: method.sig.ident.to_string(),
                        },
                        doc,
                    );
                }
            }
        }

        syn::visit::visit_item_impl(self, node);
    }
}

/// Name of the self type of an impl block, if it is a plain path
fn impl_type_name(node: &syn::ItemImpl) -> Option<String> {
    if let syn::Type::Path(type_path) = node.self_ty.as_ref() {
        type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
    } else {
        None
    }
}

/// Joins the `#[doc]` attributes of an item into raw comment text.
///
/// Each `///` line becomes one line of output with the conventional single
/// leading space stripped, which is exactly the form the annotation parser
/// expects: comment text with the comment-syntax decoration removed.
fn doc_text(attrs: &[syn::Attribute]) -> Option<String> {
    let mut lines = Vec::new();

    for attr in attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }
        if let syn::Meta::NameValue(name_value) = &attr.meta {
            if let syn::Expr::Lit(expr_lit) = &name_value.value {
                if let syn::Lit::Str(lit_str) = &expr_lit.lit {
                    let line = lit_str.value();
                    let line = line.strip_prefix(' ').unwrap_or(&line);
                    lines.push(line.to_string());
                }
            }
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

/// Paths of the Rust files a directory walk would index; exposed for
/// callers that want to report scan coverage.
pub fn rust_files_under(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| {
            if e.path() == root {
                return true;
            }
            let file_name = e.file_name().to_string_lossy();
            !file_name.starts_with('.') && file_name != "target"
        })
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path().to_path_buf())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("rs")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTROLLER_SOURCE: &str = r#"
        /// @group Group A
        pub struct TestController;

        impl TestController {
            /// Example title.
            /// This will be the long description.
            pub fn with_endpoint_description(&self) {}

            pub fn undocumented(&self) {}
        }

        /// List the things.
        pub fn list_things() {}
    "#;

    fn method_site(method: &str) -> DeclarationSite {
        DeclarationSite::Method {
            type_name: "TestController".to_string(),
            method: method.to_string(),
        }
    }

    #[test]
    fn test_index_struct_docs_as_type_site() {
        let index = SourceIndex::from_source(CONTROLLER_SOURCE).unwrap();

        let comment = index
            .comment_of(&DeclarationSite::Type("TestController".to_string()))
            .unwrap();
        assert_eq!(comment, "@group Group A");
    }

    #[test]
    fn test_index_impl_method_docs() {
        let index = SourceIndex::from_source(CONTROLLER_SOURCE).unwrap();

        let comment = index
            .comment_of(&method_site("with_endpoint_description"))
            .unwrap();
        assert_eq!(
            comment,
            "Example title.\nThis will be the long description."
        );
    }

    #[test]
    fn test_undocumented_method_has_no_comment() {
        let index = SourceIndex::from_source(CONTROLLER_SOURCE).unwrap();
        assert_eq!(index.comment_of(&method_site("undocumented")), None);
    }

    #[test]
    fn test_index_free_function_docs() {
        let index = SourceIndex::from_source(CONTROLLER_SOURCE).unwrap();

        let comment = index
            .comment_of(&DeclarationSite::Function("list_things".to_string()))
            .unwrap();
        assert_eq!(comment, "List the things.");
    }

    #[test]
    fn test_struct_docs_win_over_impl_docs() {
        let source = r#"
            /// From the struct.
            pub struct Widget;

            /// From the impl.
            impl Widget {}
        "#;
        let index = SourceIndex::from_source(source).unwrap();

        let comment = index
            .comment_of(&DeclarationSite::Type("Widget".to_string()))
            .unwrap();
        assert_eq!(comment, "From the struct.");
    }

    #[test]
    fn test_items_inside_modules_are_indexed() {
        let source = r#"
            mod controllers {
                /// Nested title.
                pub fn nested_handler() {}
            }
        "#;
        let index = SourceIndex::from_source(source).unwrap();

        let comment = index
            .comment_of(&DeclarationSite::Function("nested_handler".to_string()))
            .unwrap();
        assert_eq!(comment, "Nested title.");
    }

    #[test]
    fn test_invalid_source_is_an_error() {
        assert!(SourceIndex::from_source("pub fn broken( {").is_err());
    }

    #[test]
    fn test_static_introspector_roundtrip() {
        let introspector = StaticIntrospector::new()
            .with(DeclarationSite::Function("f".to_string()), "@authenticated");

        assert_eq!(
            introspector.comment_of(&DeclarationSite::Function("f".to_string())),
            Some("@authenticated".to_string())
        );
        assert_eq!(
            introspector.comment_of(&DeclarationSite::Function("g".to_string())),
            None
        );
    }
}
