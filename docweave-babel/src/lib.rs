//! Markdown <-> cloud document interoperability
//!
//!     This crate holds everything docweave does that is not a shell concern: converting
//!     Markdown into an importable HTML page, styling the imported document, converting an
//!     exported document back into Markdown, extracting comments, rendering diagram
//!     blocks and ingesting external content.
//!
//!     This is a pure lib, that is, it powers the docweave-cli but is shell agnostic: no
//!     code here prints, reads env vars or talks HTTP. Remote services and local state are
//!     reached only through the traits in [`service`]; the CLI implements them over HTTP
//!     and JSON files, the tests with recording fakes.
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # FormatError, ServiceError, PipelineError, Outcome
//!     ├── service.rs              # DocumentService, DiagramRenderer, WebSource, HistoryLog
//!     ├── style.rs                # StyleConfig
//!     ├── formats
//!     │   ├── markdown            # comrak rendering + Markdown cleanup
//!     │   ├── html                # DOM cleaner + Markdown writer
//!     │   └── pdf                 # pdftotext extraction (feature `pdf-import`)
//!     ├── templates               # import page template, image references
//!     ├── styling                 # structure tree, classification, mutations
//!     ├── publish.rs              # push
//!     ├── pull.rs
//!     ├── comments.rs
//!     ├── diagram.rs
//!     └── ingest.rs
//!
//! Testing
//!     tests
//!     ├── lib.rs
//!     ├── common                  # recording fakes of the service traits
//!     └── <area>
//!         └── <testname>.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! The Round Trip
//!
//!     Push and pull are not inverses. Push goes Markdown -> HTML -> native document, and
//!     the import decides how HTML maps to document structure. Pull goes native document
//!     -> exported HTML -> Markdown, and the export flattens most semantics into CSS
//!     classes on spans. The reverse converter recovers what it can (emphasis, code
//!     blocks, list nesting) from those classes, and the cleanup pass removes the rest.
//!     Expect headings, paragraphs, lists, links, tables and code to survive; expect
//!     anything the service has no native notion of to be lost.
//!
//! Library Choices
//!
//!     Parsing and rendering are offloaded to specialized crates: comrak for Markdown,
//!     html5ever for HTML. The scope here is the adaptation between them and the
//!     document service's view of a document.
//!
pub mod comments;
pub mod diagram;
pub mod error;
pub mod formats;
pub mod ingest;
pub mod publish;
pub mod pull;
pub mod service;
pub mod style;
pub mod styling;
pub mod templates;

pub use error::{FormatError, Outcome, PipelineError, ServiceError};
pub use publish::{push, PushRequest};
pub use pull::{pull, PullTarget};
pub use service::{DiagramRenderer, DocumentService, HistoryEntry, HistoryLog, WebSource};
pub use style::StyleConfig;
