//! ErrorCategory - Coarse classification of failures for user-facing messages

text_enum! {
    /// Buckets used to pick a user-facing message for a raw error
    pub enum ErrorCategory {
        Network => "network",
        Auth => "auth",
        Database => "database",
        Validation => "validation",
        Unknown => "unknown",
    }
}

impl ErrorCategory {
    /// Arabic message shown to end users
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorCategory::Network => {
                "خطأ في الاتصال بالشبكة. يرجى التحقق من اتصالك والمحاولة مرة أخرى"
            }
            ErrorCategory::Auth => {
                "انتهت صلاحية الجلسة أو ليس لديك صلاحية. يرجى تسجيل الدخول مرة أخرى"
            }
            ErrorCategory::Database => "حدث خطأ في قاعدة البيانات. يرجى المحاولة لاحقاً",
            ErrorCategory::Validation => "البيانات المدخلة غير صحيحة. يرجى مراجعة الحقول",
            ErrorCategory::Unknown => "حدث خطأ غير متوقع. يرجى المحاولة مرة أخرى",
        }
    }
}
