use crate::commands::{fields, normalize, parse, request, suggest, tokens};

#[derive(Clone, Copy)]
pub struct ExampleGroup {
    pub title: &'static str,
    pub commands: &'static [&'static str],
}

#[derive(Clone, Copy)]
pub struct CommandExample {
    pub name: &'static str,
    pub groups: &'static [ExampleGroup],
}

pub fn command_examples() -> &'static [CommandExample] {
    &[
        CommandExample {
            name: "tokens",
            groups: tokens::EXAMPLES,
        },
        CommandExample {
            name: "parse",
            groups: parse::EXAMPLES,
        },
        CommandExample {
            name: "normalize",
            groups: normalize::EXAMPLES,
        },
        CommandExample {
            name: "suggest",
            groups: suggest::EXAMPLES,
        },
        CommandExample {
            name: "request",
            groups: request::EXAMPLES,
        },
        CommandExample {
            name: "fields",
            groups: fields::EXAMPLES,
        },
    ]
}
