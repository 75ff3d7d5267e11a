//! The built-in extension modules, registered in the catalog under the names `base`,
//! `newcommand`, `tags` and `physics`.
mod base;
mod environments;
mod newcommand;
mod physics;
mod symbols;
mod tags;

use crate::{
    extension::ExtensionModule,
    registry::{Command, Handler, MacroFn, Param},
};

pub(crate) fn builtin_modules() -> Vec<(&'static str, ExtensionModule)> {
    vec![
        ("base", base::module()),
        ("newcommand", newcommand::module()),
        ("tags", tags::module()),
        ("physics", physics::module()),
    ]
}

const fn command(func: MacroFn) -> Handler {
    Handler::Macro(Command::new(func))
}

const fn command_with(func: MacroFn, params: &'static [Param]) -> Handler {
    Handler::Macro(Command::new(func).with_params(params))
}

const fn starred(func: MacroFn, params: &'static [Param]) -> Handler {
    Handler::Macro(Command::new(func).with_params(params).starred())
}

const fn environment(func: MacroFn, params: &'static [Param]) -> Handler {
    Handler::Environment(Command::new(func).with_params(params))
}
