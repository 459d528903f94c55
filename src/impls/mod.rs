mod artifact_sink;
mod credential_store;
mod remote_backend;
