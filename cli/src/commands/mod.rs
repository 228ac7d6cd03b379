mod category;
mod helpers;
mod import;
mod recipe;

pub(crate) use category::{cmd_category_add, cmd_category_list};
pub(crate) use import::{cmd_import, cmd_init};
pub(crate) use recipe::{cmd_add, cmd_delete, cmd_list, cmd_show, cmd_update};
