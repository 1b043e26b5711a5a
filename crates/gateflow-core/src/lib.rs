//! GateFlow Core
//!
//! Serverless Framework のデプロイテンプレート（デプロイ記述子）を読み込み、
//! 関数リソースとアーカイブ配置先を取り出します。

pub mod derive;
pub mod error;
pub mod loader;
pub mod model;

pub use derive::{archive_object_name, bucket_name, parse_timeout};
pub use error::{DescriptorError, Result};
pub use loader::{CREATE_TEMPLATE, UPDATE_TEMPLATE, load_descriptor, load_template};
pub use model::{
    ARCHIVE_ENTRY_INDEX, ArtifactLocation, Descriptor, DescriptorEntry, EntryProperties,
    HttpsTrigger, Template,
};
