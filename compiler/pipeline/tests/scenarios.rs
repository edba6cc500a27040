//! End-to-end runs over real temp directories.

use std::fs;
use std::path::{Path, PathBuf};

use events::Event;
use indoc::indoc;
use model::TypeName;
use pipeline::Pipeline;
use plugins::{InsertionPointPrinter, Plugin, RenderError, Renderer};
use pretty_assertions::assert_eq;
use projections::{ContextBuilder, Projection, QueryContext};
use prost_types::compiler::CodeGeneratorRequest;
use prost_types::{DescriptorProto, FileDescriptorProto};
use sources::{CommentSyntax, InsertionPoint, SourceSet};
use tempfile::TempDir;

/// A request declaring one `Journey` message in `acme.travel`.
fn journey_request() -> CodeGeneratorRequest {
    CodeGeneratorRequest {
        file_to_generate: vec!["acme/travel/journey.proto".to_string()],
        proto_file: vec![FileDescriptorProto {
            name: Some("acme/travel/journey.proto".to_string()),
            package: Some("acme.travel".to_string()),
            syntax: Some("proto3".to_string()),
            message_type: vec![DescriptorProto {
                name: Some("Journey".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }],
        ..Default::default()
    }
}

/// Message types discovered during the drain.
struct DiscoveredType {
    name: TypeName,
}

impl Projection for DiscoveredType {
    type Key = TypeName;

    fn route(event: &Event) -> Option<TypeName> {
        match event {
            Event::TypeEntered(message) => Some(message.name.clone()),
            _ => None,
        }
    }

    fn create(key: &TypeName) -> Self { Self { name: key.clone() } }

    fn apply(&mut self, _event: &Event) {}
}

/// Registers the [`DiscoveredType`] projection.
struct TypeScout;

impl Plugin for TypeScout {
    fn name(&self) -> &'static str { "TypeScout" }

    fn fill_in(&self, builder: &mut ContextBuilder<'_>) {
        builder.add_projection::<DiscoveredType>();
    }
}

/// Prefixes every mention of a discovered type name with `_` in one file.
struct Underscorer {
    target: &'static str,
}

impl Renderer for Underscorer {
    fn name(&self) -> &'static str { "Underscorer" }

    fn render(
        &mut self,
        context: &QueryContext,
        sources: &mut SourceSet,
    ) -> Result<(), RenderError> {
        for record in context.select::<DiscoveredType>()?.all() {
            let simple = record.name.simple_name().to_string();
            let file = sources.file_mut(self.target)?;
            let code = file.code().to_string();
            file.overwrite(code.replace(&simple, &format!("_{simple}")));
        }
        Ok(())
    }
}

/// Emits a fixed new file.
struct Creator;

impl Renderer for Creator {
    fn name(&self) -> &'static str { "Creator" }

    fn render(
        &mut self,
        _context: &QueryContext,
        sources: &mut SourceSet,
    ) -> Result<(), RenderError> {
        sources.create_file("acme/travel/JourneyInternal.java", "class JourneyInternal");
        Ok(())
    }
}

/// Deletes a fixed file.
struct Deleter {
    target: &'static str,
}

impl Renderer for Deleter {
    fn name(&self) -> &'static str { "Deleter" }

    fn render(
        &mut self,
        _context: &QueryContext,
        sources: &mut SourceSet,
    ) -> Result<(), RenderError> {
        sources.delete(self.target)?;
        Ok(())
    }
}

/// Adds one line at the `file_start` point of one file.
struct Prepender {
    target: &'static str,
    line: &'static str,
}

impl Renderer for Prepender {
    fn name(&self) -> &'static str { "Prepender" }

    fn render(
        &mut self,
        _context: &QueryContext,
        sources: &mut SourceSet,
    ) -> Result<(), RenderError> {
        let file = sources.file_mut(self.target)?;
        file.at(&InsertionPoint::file_start()).add(&[self.line]);
        Ok(())
    }
}

/// Rewrites greetings in files of one language, leaving the rest unread.
struct LanguageGreeter {
    extension: &'static str,
    greeting: &'static str,
}

impl Renderer for LanguageGreeter {
    fn name(&self) -> &'static str { "LanguageGreeter" }

    fn render(
        &mut self,
        _context: &QueryContext,
        sources: &mut SourceSet,
    ) -> Result<(), RenderError> {
        let targets: Vec<PathBuf> = sources
            .paths()
            .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(self.extension))
            .map(Path::to_path_buf)
            .collect();
        for target in targets {
            let file = sources.file_mut(&target)?;
            let code = file.code().to_string();
            file.overwrite(code.replace("Hello", self.greeting));
        }
        Ok(())
    }
}

/// Writes the number of discovered types into `report.txt`.
struct Reporter;

impl Renderer for Reporter {
    fn name(&self) -> &'static str { "Reporter" }

    fn render(
        &mut self,
        context: &QueryContext,
        sources: &mut SourceSet,
    ) -> Result<(), RenderError> {
        let count = context.select::<DiscoveredType>()?.count();
        sources.create_file("report.txt", count.to_string());
        Ok(())
    }
}

fn seed(root: &Path, path: &str, contents: &str) {
    let target = root.join(path);
    fs::create_dir_all(target.parent().expect("parent")).expect("create parent dirs");
    fs::write(target, contents).expect("seed file");
}

#[test]
fn enhances_content_keyed_on_a_type_event() {
    let dir = TempDir::new().expect("temp dir");
    seed(dir.path(), "SourceCode.java", "Journey worth taking");

    Pipeline::builder()
        .request(journey_request())
        .source_root(dir.path())
        .add_plugin(TypeScout)
        .add_renderer(Underscorer { target: "SourceCode.java" })
        .build()
        .expect("build pipeline")
        .run()
        .expect("run pipeline");

    let content = fs::read_to_string(dir.path().join("SourceCode.java")).expect("content");
    assert_eq!(content, "_Journey worth taking");
}

#[test]
fn creates_a_new_file_on_disk() {
    let dir = TempDir::new().expect("temp dir");

    Pipeline::builder()
        .request(journey_request())
        .source_root(dir.path())
        .add_renderer(Creator)
        .build()
        .expect("build pipeline")
        .run()
        .expect("run pipeline");

    let created = dir.path().join("acme/travel/JourneyInternal.java");
    assert!(created.exists());
    let content = fs::read_to_string(created).expect("content");
    assert!(content.contains("class JourneyInternal"));
}

#[test]
fn deletes_an_existing_file() {
    let dir = TempDir::new().expect("temp dir");
    seed(dir.path(), "io/acme/test/DeleteMe.java", "foo bar");

    Pipeline::builder()
        .request(journey_request())
        .source_root(dir.path())
        .add_renderer(Deleter { target: "DeleteMe.java" })
        .build()
        .expect("build pipeline")
        .run()
        .expect("run pipeline");

    assert!(!dir.path().join("io/acme/test/DeleteMe.java").exists());
}

#[test]
fn printed_markers_receive_insertions() {
    let dir = TempDir::new().expect("temp dir");
    seed(dir.path(), "Greeting.java", "foo bar");

    Pipeline::builder()
        .request(journey_request())
        .source_root(dir.path())
        .add_renderer(InsertionPointPrinter::new(CommentSyntax::slashes()).for_extension("java"))
        .add_renderer(Prepender { target: "Greeting.java", line: "Hello from R" })
        .build()
        .expect("build pipeline")
        .run()
        .expect("run pipeline");

    let content = fs::read_to_string(dir.path().join("Greeting.java")).expect("content");
    assert_eq!(
        content,
        indoc! {"
            // INSERT:'file_start'
            Hello from R
            foo bar
            // INSERT:'file_end'"},
    );
}

#[test]
fn renderers_dispatch_by_language() {
    let dir = TempDir::new().expect("temp dir");
    seed(dir.path(), "test/source.js", "alert('Hello')");
    seed(dir.path(), "corp/acme/test/Source.kt", "println(\"Hello\")");

    Pipeline::builder()
        .request(journey_request())
        .source_root(dir.path())
        .add_renderer(LanguageGreeter { extension: "js", greeting: "Hello JavaScript" })
        .add_renderer(LanguageGreeter { extension: "kt", greeting: "Hello Kotlin" })
        .build()
        .expect("build pipeline")
        .run()
        .expect("run pipeline");

    let js = fs::read_to_string(dir.path().join("test/source.js")).expect("js content");
    let kt = fs::read_to_string(dir.path().join("corp/acme/test/Source.kt")).expect("kt content");
    assert!(js.contains("Hello JavaScript"));
    assert!(kt.contains("Hello Kotlin"));
}

#[test]
fn markers_never_materialize_in_files_nobody_reads() {
    let dir = TempDir::new().expect("temp dir");
    seed(dir.path(), "Lonely.java", "class Lonely {}");

    Pipeline::builder()
        .request(journey_request())
        .source_root(dir.path())
        .add_renderer(InsertionPointPrinter::new(CommentSyntax::slashes()).for_extension("java"))
        .add_renderer(LanguageGreeter { extension: "js", greeting: "Hello JavaScript" })
        .build()
        .expect("build pipeline")
        .run()
        .expect("run pipeline");

    let content = fs::read_to_string(dir.path().join("Lonely.java")).expect("content");
    assert_eq!(content, "class Lonely {}");
    assert!(!content.contains("INSERT:"));
}

#[test]
fn a_run_without_extensions_leaves_the_tree_untouched() {
    let dir = TempDir::new().expect("temp dir");
    seed(dir.path(), "Pristine.java", "untouched");
    // A rewrite would fail on a read-only file.
    let target = dir.path().join("Pristine.java");
    let mut permissions = fs::metadata(&target).expect("metadata").permissions();
    permissions.set_readonly(true);
    fs::set_permissions(&target, permissions).expect("set read-only");

    Pipeline::builder()
        .request(journey_request())
        .source_root(dir.path())
        .build()
        .expect("build pipeline")
        .run()
        .expect("run pipeline");

    assert_eq!(fs::read_to_string(&target).expect("content"), "untouched");
}

#[test]
fn projections_reflect_every_event_before_rendering() {
    let dir = TempDir::new().expect("temp dir");
    let mut request = journey_request();
    // A second file with two more messages, streamed after the first.
    request.file_to_generate.push("acme/travel/extras.proto".to_string());
    request.proto_file.push(FileDescriptorProto {
        name: Some("acme/travel/extras.proto".to_string()),
        package: Some("acme.travel".to_string()),
        syntax: Some("proto3".to_string()),
        message_type: vec![
            DescriptorProto { name: Some("Leg".to_string()), ..Default::default() },
            DescriptorProto { name: Some("Stop".to_string()), ..Default::default() },
        ],
        ..Default::default()
    });

    Pipeline::builder()
        .request(request)
        .source_root(dir.path())
        .add_plugin(TypeScout)
        .add_renderer(Reporter)
        .build()
        .expect("build pipeline")
        .run()
        .expect("run pipeline");

    let report = fs::read_to_string(dir.path().join("report.txt")).expect("report");
    assert_eq!(report, "3");
}

#[test]
fn a_created_file_deleted_later_in_the_chain_never_appears() {
    let dir = TempDir::new().expect("temp dir");

    Pipeline::builder()
        .request(journey_request())
        .source_root(dir.path())
        .add_renderer(Creator)
        .add_renderer(Deleter { target: "acme/travel/JourneyInternal.java" })
        .build()
        .expect("build pipeline")
        .run()
        .expect("run pipeline");

    assert!(!dir.path().join("acme/travel/JourneyInternal.java").exists());
}

#[test]
fn serialized_requests_round_trip_through_the_builder() {
    use prost::Message;

    let dir = TempDir::new().expect("temp dir");
    let bytes = journey_request().encode_to_vec();

    Pipeline::builder()
        .request_bytes(&bytes)
        .expect("decode request")
        .source_root(dir.path())
        .add_plugin(TypeScout)
        .add_renderer(Reporter)
        .build()
        .expect("build pipeline")
        .run()
        .expect("run pipeline");

    let report = fs::read_to_string(dir.path().join("report.txt")).expect("report");
    assert_eq!(report, "1");
}

#[test]
fn runs_from_a_toml_configuration() {
    use prost::Message;

    let dir = TempDir::new().expect("temp dir");
    let request_path = dir.path().join("request.bin");
    fs::write(&request_path, journey_request().encode_to_vec()).expect("write request");
    let sources_root = dir.path().join("gen");
    seed(&sources_root, "SourceCode.java", "Journey worth taking");

    let run_config = config::RunConfig {
        request: config::RequestConfig { path: request_path },
        sources: config::SourcesConfig { root: sources_root.clone() },
        logging: config::LoggingConfig { level: "info".to_string(), file: None },
    };
    Pipeline::from_config(
        &run_config,
        vec![Box::new(TypeScout)],
        vec![Box::new(Underscorer { target: "SourceCode.java" })],
    )
    .expect("build pipeline")
    .run()
    .expect("run pipeline");

    let content = fs::read_to_string(sources_root.join("SourceCode.java")).expect("content");
    assert_eq!(content, "_Journey worth taking");
}

#[test]
fn garbage_request_bytes_are_rejected() {
    let result = Pipeline::builder().request_bytes(&[0xff, 0xff, 0xff, 0x1f]);
    assert!(result.is_err());
}

#[test]
fn the_builder_requires_a_request_and_a_root() {
    assert!(Pipeline::builder().build().is_err());
    assert!(Pipeline::builder().request(journey_request()).build().is_err());
}
