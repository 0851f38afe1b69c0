// Adapters layer: concrete implementations of the domain ports for
// standalone use. An embedding host runtime supplies its own.

pub mod http;
