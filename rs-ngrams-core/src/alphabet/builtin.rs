use super::language::{Language, LanguageCode, LanguageMap};
use crate::error::{Error, Result};

/// Built-in alphabets as `(code, name, letters)`, letters already lowercase.
const BUILTIN: &[(&str, &str, &str)] = &[
	("af", "Afrikaans", "abcdefghijklmnopqrstuvwxyzáêéèëïíîôóúû"),
	("ar", "Arabic", "أابتثجحخدذرزسشصضطظعغفقكلمنهؤوئىيء"),
	("da", "Danish", "abcdefghijklmnopqrstuvwxyzæøå"),
	("de", "German", "abcdefghijklmnopqrstuvwxyzäöüß"),
	("en", "English", "abcdefghijklmnopqrstuvwxyz"),
	("es", "Spanish", "abcdefghijklmnopqrstuvwxyzáéíñóúü"),
	("et", "Estonian", "abcdefghijklmnopqrstuvwxyzäöõü"),
	("fi", "Finnish", "abcdefghijklmnopqrstuvwxyzäö"),
	("fr", "French", "abcdefghijklmnopqrstuvwxyzàâæçéèêëîïôœùûüÿ"),
	("nl", "Dutch", "abcdefghijklmnopqrstuvwxyzàäèéëïĳöü"),
	("sv", "Swedish", "abcdefghijklmnopqrstuvwxyzåäö"),
];

/// Returns the built-in language for `code`.
///
/// # Errors
/// Returns [`Error::BuiltinNotFound`] naming the code if it is not built in.
pub fn builtin(code: &str) -> Result<Language> {
	BUILTIN
		.iter()
		.find(|(c, _, _)| *c == code)
		.map(|(c, name, letters)| Language::new(*c, *name, letters))
		.ok_or_else(|| Error::BuiltinNotFound(LanguageCode::from(code)))
}

/// Returns all built-in languages.
pub fn builtin_languages() -> LanguageMap {
	BUILTIN
		.iter()
		.map(|(code, name, letters)| Language::new(*code, *name, letters))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn english_is_built_in() {
		let en = builtin("en").unwrap();
		assert_eq!(en.name, "English");
		assert_eq!(en.code.as_str(), "en");
		assert_eq!(en.letters().chars().count(), 26);
	}

	#[test]
	fn unknown_builtin_is_an_error() {
		let err = builtin("tlh").unwrap_err();
		assert!(matches!(err, Error::BuiltinNotFound(_)));
		assert!(err.to_string().contains("tlh"));
	}

	#[test]
	fn builtin_letters_are_lowercase() {
		let languages = builtin_languages();
		assert_eq!(languages.len(), BUILTIN.len());
		for lang in languages.iter() {
			assert_eq!(lang.letters(), lang.letters().to_lowercase(), "{}", lang.code);
		}
	}
}
