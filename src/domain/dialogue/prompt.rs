//! 对白生成提示词模板

use super::value_objects::{SpeakerId, SpeakerRoster};

/// 构造发送给生成模型的提示词
///
/// 模板要求约 10 到 15 句对白、两个指定名字的角色，
/// 并以 "<标签>: ..." 的格式输出，末尾以第一个角色的标签收尾引导续写。
pub fn build_dialogue_prompt(extracted_text: &str, roster: &SpeakerRoster) -> String {
    let a = roster.get(SpeakerId::A).label();
    let b = roster.get(SpeakerId::B).label();

    format!(
        "À partir du texte suivant extrait du PDF, créez un court dialogue entre deux personnages.\n\
         Le dialogue doit discuter du sujet principal du texte et des idées clés présentées.\n\
         Le dialogue doit comporter environ 10 à 15 échanges (répliques).\n\
         Donnez des noms aux deux personnages (par exemple, '{a}' et '{b}').\n\
         Formatez le dialogue comme suit, avec le nom du personnage suivi de deux-points :\n\
         \n\
         {a}: ...\n\
         {b}: ...\n\
         {a}: ...\n\
         {b}: ...\n\
         ...\n\
         \n\
         ---\n\
         Texte extrait du PDF :\n\
         {text}\n\
         ---\n\
         \n\
         Dialogue :\n\
         {a}:\n",
        a = a,
        b = b,
        text = extracted_text.trim(),
    )
}
