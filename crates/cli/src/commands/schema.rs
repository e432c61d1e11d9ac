//! GraphQL schema export.

/// Print the schema in SDL form to stdout.
#[allow(clippy::print_stdout)]
pub fn print() {
    println!("{}", gym_roster_server::graphql::schema_sdl());
}
