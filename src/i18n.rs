use std::collections::HashMap;

pub struct I18n {
    translations: HashMap<String, HashMap<String, String>>,
    current_lang: String,
}

impl I18n {
    pub fn new(lang: &str) -> Self {
        let mut translations = HashMap::new();

        // English
        let mut en = HashMap::new();
        // Workflow notices
        en.insert("no_text_selected".to_string(), "No Text Selected!".to_string());
        en.insert("translation_not_given".to_string(), "Translation not given!".to_string());
        en.insert("cancelled".to_string(), "Localization cancelled, nothing was changed".to_string());
        en.insert("key_exists".to_string(), "'{0}' already exists !".to_string());
        en.insert("exists_on_original".to_string(), "Translation already exist on original!".to_string());
        en.insert("exists_on_target".to_string(), "Translation already exist on target!".to_string());
        en.insert("translation_added".to_string(), "Translation Added!".to_string());
        en.insert("entry_added".to_string(), "Added '{0}' to {1}".to_string());
        en.insert("directive_inserted".to_string(), "Replaced selection with {0}".to_string());
        en.insert("document_not_saved".to_string(), "couldn't save the document.".to_string());
        en.insert("dry_run_notice".to_string(), "Dry run: no file was written".to_string());
        en.insert("resource_diff".to_string(), "Changes to {0}:".to_string());

        // Prompts
        en.insert("prompt_key".to_string(), "Target Translation Key".to_string());
        en.insert("prompt_value".to_string(), "Target Translation Value, ex: مرحبا".to_string());
        en.insert("key_required".to_string(), "Key is required !".to_string());
        en.insert("value_required".to_string(), "array value is required !".to_string());
        en.insert("prompt_hint".to_string(), "Enter=confirm, Esc=cancel".to_string());
        en.insert("warning_interactive_failed".to_string(), "Warning: Cannot enable interactive mode, falling back to simple prompts".to_string());

        // Config
        en.insert("config_written".to_string(), "Configuration written to {0}".to_string());
        en.insert("config_exists".to_string(), "{0} already exists, use --force to overwrite".to_string());

        // Error messages
        en.insert("error_create_directory".to_string(), "couldn't create new directory ! ({0})".to_string());
        en.insert("error_read_file".to_string(), "couldn't read file content ({0})".to_string());
        en.insert("error_write_file".to_string(), "couldn't write file content ! ({0})".to_string());
        en.insert("error_open_document".to_string(), "couldn't open document {0}".to_string());
        en.insert("error_invalid_range".to_string(), "invalid selection range '{0}', expected LINE:COL-LINE:COL".to_string());
        en.insert("error_range_out_of_bounds".to_string(), "selection range '{0}' is outside the document".to_string());
        en.insert("error_text_not_found".to_string(), "'{0}' was not found in the document".to_string());
        en.insert("error_save_config".to_string(), "couldn't save configuration to {0}".to_string());
        en.insert("error_prompt".to_string(), "couldn't read user input".to_string());

        // Arabic
        let mut ar = HashMap::new();
        // Workflow notices
        ar.insert("no_text_selected".to_string(), "لم يتم تحديد أي نص!".to_string());
        ar.insert("translation_not_given".to_string(), "لم يتم إدخال الترجمة!".to_string());
        ar.insert("cancelled".to_string(), "تم إلغاء الترجمة، لم يتم تغيير أي شيء".to_string());
        ar.insert("key_exists".to_string(), "'{0}' موجود مسبقاً !".to_string());
        ar.insert("exists_on_original".to_string(), "الترجمة موجودة مسبقاً في الملف الأصلي!".to_string());
        ar.insert("exists_on_target".to_string(), "الترجمة موجودة مسبقاً في الملف الهدف!".to_string());
        ar.insert("translation_added".to_string(), "تمت إضافة الترجمة!".to_string());
        ar.insert("entry_added".to_string(), "تمت إضافة '{0}' إلى {1}".to_string());
        ar.insert("directive_inserted".to_string(), "تم استبدال التحديد بـ {0}".to_string());
        ar.insert("document_not_saved".to_string(), "تعذر حفظ المستند.".to_string());
        ar.insert("dry_run_notice".to_string(), "تشغيل تجريبي: لم تتم كتابة أي ملف".to_string());
        ar.insert("resource_diff".to_string(), "التغييرات على {0}:".to_string());

        // Prompts
        ar.insert("prompt_key".to_string(), "مفتاح الترجمة".to_string());
        ar.insert("prompt_value".to_string(), "قيمة الترجمة، مثال: مرحبا".to_string());
        ar.insert("key_required".to_string(), "المفتاح مطلوب !".to_string());
        ar.insert("value_required".to_string(), "القيمة مطلوبة !".to_string());
        ar.insert("prompt_hint".to_string(), "Enter=تأكيد، Esc=إلغاء".to_string());
        ar.insert("warning_interactive_failed".to_string(), "تحذير: تعذر تفعيل الوضع التفاعلي، سيتم استخدام الإدخال البسيط".to_string());

        // Config
        ar.insert("config_written".to_string(), "تمت كتابة الإعدادات إلى {0}".to_string());
        ar.insert("config_exists".to_string(), "{0} موجود مسبقاً، استخدم --force للاستبدال".to_string());

        // Error messages
        ar.insert("error_create_directory".to_string(), "تعذر إنشاء المجلد ! ({0})".to_string());
        ar.insert("error_read_file".to_string(), "تعذرت قراءة محتوى الملف ({0})".to_string());
        ar.insert("error_write_file".to_string(), "تعذرت كتابة محتوى الملف ! ({0})".to_string());
        ar.insert("error_open_document".to_string(), "تعذر فتح المستند {0}".to_string());
        ar.insert("error_invalid_range".to_string(), "نطاق تحديد غير صالح '{0}'، الصيغة المتوقعة LINE:COL-LINE:COL".to_string());
        ar.insert("error_range_out_of_bounds".to_string(), "نطاق التحديد '{0}' خارج حدود المستند".to_string());
        ar.insert("error_text_not_found".to_string(), "لم يتم العثور على '{0}' في المستند".to_string());
        ar.insert("error_save_config".to_string(), "تعذر حفظ الإعدادات في {0}".to_string());
        ar.insert("error_prompt".to_string(), "تعذرت قراءة إدخال المستخدم".to_string());

        translations.insert("en".to_string(), en);
        translations.insert("ar".to_string(), ar);

        // Accept locale-style codes such as ar_EG.UTF-8
        let effective_lang = if lang.starts_with("ar") || lang == "arabic" {
            "ar"
        } else {
            "en"
        };

        Self {
            translations,
            current_lang: effective_lang.to_string(),
        }
    }

    pub fn t(&self, key: &str) -> String {
        if let Some(lang_map) = self.translations.get(&self.current_lang) {
            if let Some(value) = lang_map.get(key) {
                return value.clone();
            }
        }
        key.to_string()
    }

    pub fn t_format(&self, key: &str, args: &[&str]) -> String {
        let template = self.t(key);
        let mut result = template;
        for (i, arg) in args.iter().enumerate() {
            result = result.replace(&format!("{{{}}}", i), arg);
        }
        result
    }
}
