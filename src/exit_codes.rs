/// Process exit codes for `acf-sparc`.
pub mod exit {
    pub const SUCCESS: i32 = 0;
    /// Already initialized, template missing, or the copy failed.
    pub const FAILURE: i32 = 1;
}
