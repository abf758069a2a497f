//! Line-based request dispatch.
//!
//! A client opens a connection, sends one line and reads until the daemon
//! closes the socket:
//!
//! ```text
//! tokenize Run fast .              -> Run fast .
//! parse:binarized The dog barked.  -> (ROOT (S ...))
//! tree The dog barked.             -> SYLT 0x01 <nodes>
//! dependencies:COLLAPSED_TREE ...  -> det(dog-2, The-1) ...
//! quit                             -> (nothing; the server stops)
//! ```
//!
//! Failures are reported as a single `ERR <code> <message>` line unless the
//! server runs with `silent_errors`, in which case protocol errors close the
//! connection without a reply.

mod commands;
mod deadline;
mod errors;
mod handler;
mod request;
mod response;
mod router;

pub(crate) use self::handler::DispatchConnectionHandler;
