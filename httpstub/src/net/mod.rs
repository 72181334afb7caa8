pub(crate) mod tcp;
