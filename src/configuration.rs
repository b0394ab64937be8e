use std::path::PathBuf;

pub trait Configuration: Clone + Send + Sync + 'static {
    fn host(&self) -> String;
    fn port(&self) -> u16;
    /// Directory for the interview snapshot, `None` keeps interviews in memory only.
    fn data_dir(&self) -> Option<PathBuf>;
    fn storage_key(&self) -> String;
}
