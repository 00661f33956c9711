// Text input — splitting a corpus into tokens and loading stop words.
//
// Everything downstream works on the finished TokenStream; nothing past this
// module touches raw text.

pub mod stop_words;
pub mod tokenizer;
