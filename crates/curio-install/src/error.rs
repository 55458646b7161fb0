/// Installation configuration errors, raised at registration time
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InstallError {
    #[error("The \"{0}\" installation task does not exist.")]
    UnknownTask(String),

    #[error("The \"{0}\" installation task is already registered.")]
    DuplicateTask(String),
}
