pub(crate) mod acceptance;
pub(crate) mod authz;
pub(crate) mod grading;
pub(crate) mod notify;
pub(crate) mod votes;
