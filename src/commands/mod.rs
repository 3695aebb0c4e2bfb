pub mod asset_path;
pub mod prepare;
pub mod url;
