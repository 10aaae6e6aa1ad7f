//! Release filtering: artifact selection and normalization into version records.

mod normalize;
mod selector;

pub use normalize::{
    ReleaseFilter, Rejection, normalize_release, normalize_releases, version_from_tag,
};
pub use selector::{is_eligible, select_asset};
