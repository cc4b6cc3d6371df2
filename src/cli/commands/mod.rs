//! One module per subcommand.

pub mod add;
pub mod completions;
pub mod copy;
pub mod edit;
pub mod generate;
pub mod init;
pub mod load;
pub mod ls;
pub mod master;
pub mod mv;
pub mod print;
pub mod rm;
