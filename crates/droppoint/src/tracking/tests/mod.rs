mod common;
mod routing;
mod timeline;
