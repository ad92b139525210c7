mod notes;
mod root;
