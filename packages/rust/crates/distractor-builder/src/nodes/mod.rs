mod build;
mod label;
mod show;
mod split;

pub(crate) use build::run_build_mode;
pub(crate) use label::run_label_mode;
pub(crate) use show::run_show_mode;
pub(crate) use split::run_split_mode;
